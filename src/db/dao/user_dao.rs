use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{BloodGroup, prelude::User, user};

/// Column values for a freshly registered account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub mobile_number: Option<String>,
    pub blood_group: Option<BloodGroup>,
}

/// Identity fields a user may change on their own account. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        let email = email.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(user::Column::Email.eq(email))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn find_by_username(&self, username: &str) -> DaoResult<Option<user::Model>> {
        let username = username.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(user::Column::Username.eq(username))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn find_by_ids(&self, ids: Vec<Uuid>) -> DaoResult<Vec<user::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(User::find()
            .filter(user::Column::Id.is_in(ids))
            .all(self.db())
            .await?)
    }

    pub async fn create_user(&self, new_user: NewUser) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            username: Set(new_user.username),
            email: Set(new_user.email),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role),
            is_active: Set(new_user.is_active),
            mobile_number: Set(new_user.mobile_number),
            blood_group: Set(new_user.blood_group),
            last_login_at: Set(None),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn set_last_login(&self, id: &Uuid, at: &DateTime<FixedOffset>) -> DaoResult<()> {
        let at = *at;
        self.update(*id, move |active| {
            active.last_login_at = Set(Some(at));
        })
        .await
        .map(|_| ())
    }

    pub async fn set_active(&self, id: &Uuid, is_active: bool) -> DaoResult<user::Model> {
        self.update(*id, move |active| {
            active.is_active = Set(is_active);
        })
        .await
    }

    pub async fn apply_changes(&self, id: &Uuid, changes: UserChanges) -> DaoResult<user::Model> {
        self.update(*id, move |active| {
            if let Some(first_name) = changes.first_name {
                active.first_name = Set(first_name);
            }
            if let Some(last_name) = changes.last_name {
                active.last_name = Set(last_name);
            }
            if let Some(email) = changes.email {
                active.email = Set(email);
            }
        })
        .await
    }
}
