use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::{
    db::dao::{DaoBase, DaoLayerError, NewUser, UserChanges, UserDao},
    db::entities::user,
    error::AppError,
};

pub const EMAIL_TAKEN: &str = "Email already exists";
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

#[derive(Clone)]
pub struct UserService {
    user_dao: UserDao,
}

impl UserService {
    pub fn new(user_dao: UserDao) -> Self {
        Self { user_dao }
    }

    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<user::Model>, AppError> {
        match self.user_dao.find_by_id(*id).await {
            Ok(model) => Ok(Some(model)),
            Err(DaoLayerError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get(&self, id: &Uuid) -> Result<user::Model, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    pub async fn find_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<user::Model>, AppError> {
        Ok(self.user_dao.find_by_ids(ids).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, AppError> {
        Ok(self.user_dao.find_by_email(email).await?)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>, AppError> {
        Ok(self.user_dao.find_by_username(username).await?)
    }

    /// Inserts the account. A unique index firing after the caller's pre-checks
    /// is reported as the matching duplicate error.
    pub async fn create_user(&self, new_user: NewUser) -> Result<user::Model, AppError> {
        match self.user_dao.create_user(new_user).await {
            Ok(user) => Ok(user),
            Err(DaoLayerError::UniqueViolation(detail)) => Err(duplicate_account(&detail)),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn set_last_login(
        &self,
        user_id: &Uuid,
        last_login: &DateTime<FixedOffset>,
    ) -> Result<(), AppError> {
        Ok(self.user_dao.set_last_login(user_id, last_login).await?)
    }

    /// Applies a self-service change. A new email must not belong to another account.
    pub async fn update_identity(
        &self,
        user_id: &Uuid,
        changes: UserChanges,
    ) -> Result<user::Model, AppError> {
        if changes.is_empty() {
            return self.get(user_id).await;
        }

        if let Some(email) = changes.email.as_deref() {
            if let Some(holder) = self.find_by_email(email).await? {
                if holder.id != *user_id {
                    return Err(AppError::validation("email", EMAIL_TAKEN));
                }
            }
        }

        match self.user_dao.apply_changes(user_id, changes).await {
            Ok(user) => Ok(user),
            Err(DaoLayerError::NotFound { .. }) => Err(AppError::not_found("User not found")),
            Err(DaoLayerError::UniqueViolation(_)) => {
                Err(AppError::validation("email", EMAIL_TAKEN))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn activate(&self, user_id: &Uuid) -> Result<user::Model, AppError> {
        match self.user_dao.set_active(user_id, true).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, username = %user.username, "user activated");
                Ok(user)
            }
            Err(DaoLayerError::NotFound { .. }) => Err(AppError::not_found("User not found")),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes the account. The donor profile and refresh tokens go with it.
    pub async fn delete(&self, user_id: &Uuid) -> Result<(), AppError> {
        match self.user_dao.delete(*user_id).await {
            Ok(id) => {
                tracing::info!(user_id = %id, "user deleted");
                Ok(())
            }
            Err(DaoLayerError::NotFound { .. }) => Err(AppError::not_found("User not found")),
            Err(err) => Err(err.into()),
        }
    }
}

fn duplicate_account(detail: &str) -> AppError {
    if detail.contains("email") {
        AppError::validation("error", EMAIL_TAKEN)
    } else {
        AppError::validation("username", USERNAME_TAKEN)
    }
}
