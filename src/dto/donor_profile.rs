use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::dao::{DonorProfileChanges, DonorSearch},
    db::entities::BloodGroup,
    error::{AppError, FieldErrors},
    services::{DonorProfileDraft, DonorProfileRecord},
};

use super::field_errors_of;

pub const DEFAULT_PAGE_SIZE: u64 = 25;
const DATE_FORMAT_MESSAGE: &str =
    "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";

/// A donor profile with its owner's username and email as stored at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonorProfileView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub blood_group: BloodGroup,
    pub district: String,
    pub date_of_donation: Option<NaiveDate>,
    pub donor_type: String,
    pub is_available: bool,
}

impl From<DonorProfileRecord> for DonorProfileView {
    fn from(record: DonorProfileRecord) -> Self {
        let DonorProfileRecord { profile, owner } = record;
        Self {
            id: profile.id,
            username: owner.username,
            email: owner.email,
            blood_group: profile.blood_group,
            district: profile.district,
            date_of_donation: profile.date_of_donation,
            donor_type: profile.donor_type,
            is_available: profile.is_available,
        }
    }
}

/// `POST /donors` body. Any `user` or `id` keys are ignored; the profile
/// always belongs to the caller.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateDonorProfileRequest {
    pub blood_group: Option<String>,
    #[serde(default, deserialize_with = "super::trimmed")]
    #[validate(required, length(min = 1, max = 100))]
    pub district: Option<String>,
    pub date_of_donation: Option<String>,
    #[serde(default, deserialize_with = "super::trimmed")]
    #[validate(required, length(min = 1, max = 50))]
    pub donor_type: Option<String>,
    pub is_available: Option<bool>,
}

impl CreateDonorProfileRequest {
    pub fn into_draft(self) -> Result<DonorProfileDraft, AppError> {
        let mut errors = field_errors_of(&self);
        let blood_group = parse_blood_group(self.blood_group.as_deref(), &mut errors);
        let date_of_donation = parse_date(self.date_of_donation.as_deref(), &mut errors);
        errors.into_result()?;

        Ok(DonorProfileDraft {
            blood_group,
            district: self.district.unwrap_or_default(),
            date_of_donation,
            donor_type: self.donor_type.unwrap_or_default(),
            is_available: self.is_available.unwrap_or(true),
        })
    }
}

/// Partial update of a donor profile. Absent keys keep their stored value;
/// `"date_of_donation": null` clears the date.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct DonorProfilePatch {
    pub blood_group: Option<String>,
    #[serde(default, deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 100))]
    pub district: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub date_of_donation: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 50))]
    pub donor_type: Option<String>,
    pub is_available: Option<bool>,
}

impl DonorProfilePatch {
    pub fn into_changes(self) -> Result<DonorProfileChanges, AppError> {
        let mut errors = field_errors_of(&self);
        let blood_group = parse_blood_group(self.blood_group.as_deref(), &mut errors);
        let date_of_donation = self
            .date_of_donation
            .map(|date| parse_date(date.as_deref(), &mut errors));
        errors.into_result()?;

        Ok(DonorProfileChanges {
            blood_group,
            district: self.district,
            date_of_donation,
            donor_type: self.donor_type,
            is_available: self.is_available,
        })
    }
}

/// Query string of `GET /donors`.
#[derive(Debug, Default, Deserialize)]
pub struct DonorSearchQuery {
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub is_available: Option<bool>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl DonorSearchQuery {
    /// Returns the filters with the requested page and page size.
    pub fn into_search(self) -> Result<(DonorSearch, u64, u64), AppError> {
        let mut errors = FieldErrors::new();
        let blood_group = parse_blood_group(self.blood_group.as_deref(), &mut errors);
        errors.into_result()?;

        let district = self
            .district
            .map(|district| district.trim().to_string())
            .filter(|district| !district.is_empty());

        Ok((
            DonorSearch {
                blood_group,
                district,
                is_available: self.is_available,
            },
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        ))
    }
}

fn parse_blood_group(raw: Option<&str>, errors: &mut FieldErrors) -> Option<BloodGroup> {
    match raw.map(str::parse::<BloodGroup>) {
        Some(Ok(group)) => Some(group),
        Some(Err(invalid)) => {
            errors.add("blood_group", invalid.to_string());
            None
        }
        None => None,
    }
}

fn parse_date(raw: Option<&str>, errors: &mut FieldErrors) -> Option<NaiveDate> {
    let raw = raw?;
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add("date_of_donation", DATE_FORMAT_MESSAGE);
            None
        }
    }
}

/// Keeps an explicit `null` distinguishable from a missing key.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
