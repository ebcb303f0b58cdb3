use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, DatabaseConnection, QueryFilter, Set,
    sea_query::{Expr, ExprTrait, Func, LikeExpr},
};
use uuid::Uuid;

use super::{DaoBase, DaoResult, PaginatedResponse};
use crate::db::entities::{BloodGroup, donor_profile, prelude::DonorProfile};

#[derive(Debug, Clone)]
pub struct NewDonorProfile {
    pub user_id: Uuid,
    pub blood_group: BloodGroup,
    pub district: String,
    pub date_of_donation: Option<NaiveDate>,
    pub donor_type: String,
    pub is_available: bool,
}

/// Whitelisted profile columns a patch may touch. `date_of_donation: Some(None)`
/// clears the stored date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonorProfileChanges {
    pub blood_group: Option<BloodGroup>,
    pub district: Option<String>,
    pub date_of_donation: Option<Option<NaiveDate>>,
    pub donor_type: Option<String>,
    pub is_available: Option<bool>,
}

/// Search filters; every `None` matches all rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonorSearch {
    pub blood_group: Option<BloodGroup>,
    pub district: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Clone)]
pub struct DonorProfileDao {
    db: DatabaseConnection,
}

impl DaoBase for DonorProfileDao {
    type Entity = DonorProfile;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl DonorProfileDao {
    pub async fn find_by_user_id(&self, user_id: &Uuid) -> DaoResult<Option<donor_profile::Model>> {
        let user_id = *user_id;
        self.find(1, 1, None, move |query| {
            query.filter(donor_profile::Column::UserId.eq(user_id))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn create_profile(&self, profile: NewDonorProfile) -> DaoResult<donor_profile::Model> {
        let model = donor_profile::ActiveModel {
            user_id: Set(profile.user_id),
            blood_group: Set(profile.blood_group),
            district: Set(profile.district),
            date_of_donation: Set(profile.date_of_donation),
            donor_type: Set(profile.donor_type),
            is_available: Set(profile.is_available),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn apply_changes(
        &self,
        id: &Uuid,
        changes: DonorProfileChanges,
    ) -> DaoResult<donor_profile::Model> {
        self.update(*id, move |active| {
            if let Some(blood_group) = changes.blood_group {
                active.blood_group = Set(blood_group);
            }
            if let Some(district) = changes.district {
                active.district = Set(district);
            }
            if let Some(date_of_donation) = changes.date_of_donation {
                active.date_of_donation = Set(date_of_donation);
            }
            if let Some(donor_type) = changes.donor_type {
                active.donor_type = Set(donor_type);
            }
            if let Some(is_available) = changes.is_available {
                active.is_available = Set(is_available);
            }
        })
        .await
    }

    /// Newest profiles first. `district` matches as a case-insensitive substring.
    pub async fn search(
        &self,
        filters: DonorSearch,
        page: u64,
        page_size: u64,
    ) -> DaoResult<PaginatedResponse<donor_profile::Model>> {
        self.find(page, page_size, None, move |mut query| {
            if let Some(blood_group) = filters.blood_group {
                query = query.filter(donor_profile::Column::BloodGroup.eq(blood_group));
            }
            if let Some(is_available) = filters.is_available {
                query = query.filter(donor_profile::Column::IsAvailable.eq(is_available));
            }
            if let Some(district) = filters.district {
                let pattern = format!("%{}%", escape_like_pattern(&district.to_lowercase()));
                query = query.filter(
                    Expr::expr(Func::lower(Expr::col(donor_profile::Column::District)))
                        .like(LikeExpr::new(pattern).escape('\\')),
                );
            }
            query
        })
        .await
    }
}

fn escape_like_pattern(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::{DonorProfileChanges, DonorProfileDao, DonorSearch, escape_like_pattern};
    use crate::db::dao::user_dao::tests::ts;
    use crate::db::dao::{DaoBase, DaoLayerError};
    use crate::db::entities::{BloodGroup, donor_profile};

    pub(crate) fn profile_model(id: Uuid, user_id: Uuid) -> donor_profile::Model {
        let now = ts();
        donor_profile::Model {
            id,
            created_at: now,
            updated_at: now,
            user_id,
            blood_group: BloodGroup::OPositive,
            district: "Dhaka".to_string(),
            date_of_donation: NaiveDate::from_ymd_opt(2025, 12, 1),
            donor_type: "regular".to_string(),
            is_available: true,
        }
    }

    #[test]
    fn like_wildcards_in_user_input_are_escaped() {
        assert_eq!(escape_like_pattern("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like_pattern("dhaka"), "dhaka");
    }

    #[tokio::test]
    async fn find_by_user_id_returns_the_profile() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[profile_model(Uuid::new_v4(), user_id)]])
            .into_connection();
        let dao = DonorProfileDao::new(&db);

        let profile = dao
            .find_by_user_id(&user_id)
            .await
            .expect("query should succeed")
            .expect("profile should exist");
        assert_eq!(profile.user_id, user_id);
    }

    #[tokio::test]
    async fn apply_changes_can_clear_the_donation_date() {
        let id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let stored = profile_model(id, user_id);
        let cleared = donor_profile::Model {
            date_of_donation: None,
            ..stored.clone()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored], [cleared]])
            .into_connection();
        let dao = DonorProfileDao::new(&db);

        let updated = dao
            .apply_changes(
                &id,
                DonorProfileChanges {
                    date_of_donation: Some(None),
                    ..DonorProfileChanges::default()
                },
            )
            .await
            .expect("update should succeed");
        assert_eq!(updated.date_of_donation, None);
    }

    #[tokio::test]
    async fn search_reports_a_following_page() {
        let user_id = Uuid::new_v4();
        let rows = vec![
            profile_model(Uuid::new_v4(), user_id),
            profile_model(Uuid::new_v4(), Uuid::new_v4()),
            profile_model(Uuid::new_v4(), Uuid::new_v4()),
        ];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([rows])
            .into_connection();
        let dao = DonorProfileDao::new(&db);

        let page = dao
            .search(
                DonorSearch {
                    blood_group: Some(BloodGroup::OPositive),
                    district: Some("dha".to_string()),
                    is_available: Some(true),
                },
                1,
                2,
            )
            .await
            .expect("search should succeed");
        assert_eq!(page.data.len(), 2);
        assert!(page.has_next);
    }

    #[tokio::test]
    async fn search_rejects_oversized_pages() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let dao = DonorProfileDao::new(&db);

        let err = dao
            .search(DonorSearch::default(), 1, 500)
            .await
            .expect_err("page size above the cap");
        assert!(matches!(
            err,
            DaoLayerError::InvalidPagination {
                page: 1,
                page_size: 500
            }
        ));
    }
}
