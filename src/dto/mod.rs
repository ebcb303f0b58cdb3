//! Request and response shapes for the JSON API, with their field validation.

pub mod donor_profile;
pub mod login;
pub mod registration;
pub mod user;

pub use donor_profile::{
    CreateDonorProfileRequest, DonorProfilePatch, DonorProfileView, DonorSearchQuery,
};
pub use login::LoginRequest;
pub use registration::RegistrationRequest;
pub use user::{UpdateMeRequest, UserView};

use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::error::FieldErrors;

/// Runs the derived validators and returns their messages keyed by field.
pub(crate) fn field_errors_of(input: &impl Validate) -> FieldErrors {
    match input.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => errors.into(),
    }
}

/// Strips surrounding whitespace from a text field before it is validated, so
/// `"   "` is reported as blank.
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(|value| value.trim().to_string()))
}
