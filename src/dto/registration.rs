use serde::Deserialize;
use validator::Validate;

use crate::{
    auth::NewAccount,
    db::entities::BloodGroup,
    error::AppError,
};

use super::field_errors_of;

pub const PASSWORD_MISMATCH: &str = "Passwords don't match";

/// `POST /register` body. Every field is required.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegistrationRequest {
    #[serde(default, deserialize_with = "super::trimmed")]
    #[validate(required, length(min = 1, max = 150))]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "super::trimmed")]
    #[validate(required, length(max = 150))]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "super::trimmed")]
    #[validate(required, length(max = 150))]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "super::trimmed")]
    #[validate(required, email, length(max = 254))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "super::trimmed")]
    #[validate(required, length(min = 1, max = 12))]
    pub mobile_number: Option<String>,
    #[validate(required)]
    pub blood_group: Option<String>,
    #[validate(required, length(min = 8))]
    pub password: Option<String>,
    #[validate(required)]
    pub confirm_password: Option<String>,
}

impl RegistrationRequest {
    /// Field checks first, then the password confirmation. Uniqueness of the
    /// email and username is left to the auth provider.
    pub fn into_account(self) -> Result<NewAccount, AppError> {
        let mut errors = field_errors_of(&self);

        let blood_group = match self.blood_group.as_deref().map(str::parse::<BloodGroup>) {
            Some(Ok(group)) => Some(group),
            Some(Err(invalid)) => {
                errors.add("blood_group", invalid.to_string());
                None
            }
            None => None,
        };
        errors.into_result()?;

        if self.password != self.confirm_password {
            return Err(AppError::validation("error", PASSWORD_MISMATCH));
        }

        Ok(NewAccount {
            username: self.username.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            mobile_number: self.mobile_number,
            blood_group,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::db::entities::BloodGroup;

    use super::{PASSWORD_MISMATCH, RegistrationRequest};

    fn valid_body() -> serde_json::Value {
        json!({
            "username": "rahim",
            "first_name": "Rahim",
            "last_name": "Uddin",
            "email": "rahim@example.com",
            "mobile_number": "01700000000",
            "blood_group": "O+",
            "password": "password123",
            "confirm_password": "password123",
        })
    }

    fn request(body: serde_json::Value) -> RegistrationRequest {
        serde_json::from_value(body).expect("body parses")
    }

    #[test]
    fn valid_request_becomes_an_account() {
        let account = request(valid_body()).into_account().expect("valid");

        assert_eq!(account.username, "rahim");
        assert_eq!(account.blood_group, Some(BloodGroup::OPositive));
        assert_eq!(account.mobile_number.as_deref(), Some("01700000000"));
    }

    #[test]
    fn mismatched_confirmation_is_reported_under_error() {
        let mut body = valid_body();
        body["confirm_password"] = json!("password124");

        let err = request(body).into_account().expect_err("mismatch");
        assert_eq!(
            err.field_errors().and_then(|errors| errors.get("error")),
            Some(PASSWORD_MISMATCH)
        );
    }

    #[test]
    fn field_errors_win_over_mismatch() {
        let mut body = valid_body();
        body["email"] = json!("nope");
        body["confirm_password"] = json!("something-else");

        let err = request(body).into_account().expect_err("invalid email");
        let errors = err.field_errors().expect("field errors");
        assert_eq!(errors.get("email"), Some("Enter a valid email address."));
        assert_eq!(errors.get("error"), None);
    }

    #[test]
    fn every_field_is_required() {
        let err = request(json!({})).into_account().expect_err("empty body");
        let errors = err.field_errors().expect("field errors");

        for field in [
            "username",
            "first_name",
            "last_name",
            "email",
            "mobile_number",
            "blood_group",
            "password",
            "confirm_password",
        ] {
            assert_eq!(errors.get(field), Some("This field is required."), "{field}");
        }
    }

    #[test]
    fn whitespace_username_is_blank_and_names_are_trimmed() {
        let mut body = valid_body();
        body["username"] = json!("    ");

        let err = request(body).into_account().expect_err("blank username");
        assert_eq!(
            err.field_errors().and_then(|errors| errors.get("username")),
            Some("This field may not be blank.")
        );

        let mut body = valid_body();
        body["username"] = json!(" rahim ");
        body["first_name"] = json!(" Rahim");
        let account = request(body).into_account().expect("valid");
        assert_eq!(account.username, "rahim");
        assert_eq!(account.first_name, "Rahim");
    }

    #[test]
    fn lower_case_blood_group_is_not_a_valid_choice() {
        let mut body = valid_body();
        body["blood_group"] = json!("o+");

        let err = request(body).into_account().expect_err("bad choice");
        assert_eq!(
            err.field_errors().and_then(|errors| errors.get("blood_group")),
            Some("\"o+\" is not a valid choice.")
        );
    }

    #[test]
    fn unknown_blood_group_is_not_a_valid_choice() {
        let mut body = valid_body();
        body["blood_group"] = json!("C+");

        let err = request(body).into_account().expect_err("bad choice");
        assert_eq!(
            err.field_errors().and_then(|errors| errors.get("blood_group")),
            Some("\"C+\" is not a valid choice.")
        );
    }

    #[test]
    fn long_mobile_number_and_short_password_are_rejected() {
        let mut body = valid_body();
        body["mobile_number"] = json!("0170000000000");
        body["password"] = json!("short");
        body["confirm_password"] = json!("short");

        let err = request(body).into_account().expect_err("invalid fields");
        let errors = err.field_errors().expect("field errors");
        assert_eq!(
            errors.get("mobile_number"),
            Some("Ensure this field has no more than 12 characters.")
        );
        assert_eq!(
            errors.get("password"),
            Some("Ensure this field has at least 8 characters.")
        );
    }
}
