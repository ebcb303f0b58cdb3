use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{db::dao::UserChanges, db::entities::user, error::AppError};

use super::field_errors_of;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&user::Model> for UserView {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<user::Model> for UserView {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}

/// `PATCH /me` body. Keys other than these are ignored.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateMeRequest {
    #[serde(default, deserialize_with = "super::trimmed")]
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "super::trimmed")]
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "super::trimmed")]
    #[validate(email, length(min = 1, max = 254))]
    pub email: Option<String>,
}

impl UpdateMeRequest {
    pub fn into_changes(self) -> Result<UserChanges, AppError> {
        field_errors_of(&self).into_result()?;

        Ok(UserChanges {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;

    use crate::db::dao::user_dao::tests::user_model;

    use super::{UpdateMeRequest, UserView};

    #[test]
    fn view_exposes_identity_fields_only() {
        let id = Uuid::new_v4();
        let view = serde_json::to_value(UserView::from(&user_model(id, "rahim")))
            .expect("view serializes");

        assert_eq!(
            view,
            json!({
                "id": id,
                "username": "rahim",
                "first_name": "Rahim",
                "last_name": "Uddin",
                "email": "rahim@example.com",
            })
        );
    }

    #[test]
    fn update_ignores_unlisted_keys() {
        let request: UpdateMeRequest = serde_json::from_value(json!({
            "last_name": "Hossain",
            "username": "hijack",
            "is_active": true,
        }))
        .expect("body parses");

        let changes = request.into_changes().expect("valid update");
        assert_eq!(changes.last_name.as_deref(), Some("Hossain"));
        assert!(changes.first_name.is_none());
        assert!(changes.email.is_none());
    }

    #[test]
    fn update_rejects_malformed_email() {
        let request = UpdateMeRequest {
            email: Some("not-an-email".to_string()),
            ..UpdateMeRequest::default()
        };

        let err = request.into_changes().expect_err("invalid email");
        assert_eq!(
            err.field_errors().and_then(|errors| errors.get("email")),
            Some("Enter a valid email address.")
        );
    }
}
