use serde::Deserialize;
use validator::Validate;

use crate::error::AppError;

use super::field_errors_of;

/// Credentials are only checked for presence here; the auth provider decides
/// whether they are valid.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "super::trimmed")]
    #[validate(required, length(min = 1))]
    pub username: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns `(username, password)`.
    pub fn into_credentials(self) -> Result<(String, String), AppError> {
        field_errors_of(&self).into_result()?;

        Ok((
            self.username.unwrap_or_default(),
            self.password.unwrap_or_default(),
        ))
    }
}
