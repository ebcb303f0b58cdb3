use sea_orm::entity::prelude::*;

use super::blood_group::BloodGroup;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "donor_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub updated_at: DateTimeWithTimeZone,
    /// Unique: a user owns at most one donor profile.
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub blood_group: BloodGroup,
    pub district: String,
    pub date_of_donation: Option<Date>,
    pub donor_type: String,
    #[sea_orm(default_value = true)]
    pub is_available: bool,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::user::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

crate::db::dao::base_traits::base_entity!();
