use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    auth::Claims,
    db::dao::{
        DaoBase, DaoLayerError, DonorProfileChanges, DonorProfileDao, DonorSearch,
        NewDonorProfile, PaginatedResponse,
    },
    db::entities::{BloodGroup, donor_profile, user},
    error::AppError,
    services::user_service::UserService,
};

pub const UNAUTHENTICATED: &str = "User must be authenticated";
pub const PROFILE_EXISTS: &str = "Donor profile already exists for this user";

/// The identity a request acts as, taken from a verified access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl Caller {
    pub fn from_claims(claims: &Claims) -> Result<Self, AppError> {
        Ok(Self {
            user_id: claims.user_id()?,
            is_admin: claims.is_admin(),
        })
    }
}

/// Validated input for a new profile. `blood_group` falls back to the one
/// the owner gave at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorProfileDraft {
    pub blood_group: Option<BloodGroup>,
    pub district: String,
    pub date_of_donation: Option<NaiveDate>,
    pub donor_type: String,
    pub is_available: bool,
}

/// A profile together with its owner as stored right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorProfileRecord {
    pub profile: donor_profile::Model,
    pub owner: user::Model,
}

#[derive(Clone)]
pub struct DonorProfileService {
    profile_dao: DonorProfileDao,
    user_service: UserService,
}

impl DonorProfileService {
    pub fn new(profile_dao: DonorProfileDao, user_service: UserService) -> Self {
        Self {
            profile_dao,
            user_service,
        }
    }

    pub async fn create(
        &self,
        caller: Option<Caller>,
        draft: DonorProfileDraft,
    ) -> Result<DonorProfileRecord, AppError> {
        let caller = caller.ok_or_else(|| AppError::validation("user", UNAUTHENTICATED))?;
        let owner = self
            .user_service
            .find_by_id(&caller.user_id)
            .await?
            .ok_or_else(|| AppError::validation("user", UNAUTHENTICATED))?;

        if self.profile_dao.find_by_user_id(&owner.id).await?.is_some() {
            return Err(AppError::validation("user", PROFILE_EXISTS));
        }

        let blood_group = draft
            .blood_group
            .or(owner.blood_group)
            .ok_or_else(|| AppError::validation("blood_group", "This field is required."))?;

        let created = self
            .profile_dao
            .create_profile(NewDonorProfile {
                user_id: owner.id,
                blood_group,
                district: draft.district,
                date_of_donation: draft.date_of_donation,
                donor_type: draft.donor_type,
                is_available: draft.is_available,
            })
            .await;

        let profile = match created {
            Ok(profile) => profile,
            Err(DaoLayerError::UniqueViolation(_)) => {
                return Err(AppError::validation("user", PROFILE_EXISTS));
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(profile_id = %profile.id, user_id = %owner.id, "donor profile created");
        Ok(DonorProfileRecord { profile, owner })
    }

    pub async fn get(&self, id: &Uuid) -> Result<DonorProfileRecord, AppError> {
        let profile = self.load(id).await?;
        self.with_owner(profile).await
    }

    pub async fn get_for_user(&self, user_id: &Uuid) -> Result<DonorProfileRecord, AppError> {
        let profile = self.load_for_user(user_id).await?;
        self.with_owner(profile).await
    }

    /// Owners may edit their own profile; admins may edit any.
    pub async fn update(
        &self,
        caller: Caller,
        id: &Uuid,
        changes: DonorProfileChanges,
    ) -> Result<DonorProfileRecord, AppError> {
        let profile = self.load(id).await?;
        self.apply(caller, profile, changes).await
    }

    pub async fn update_for_user(
        &self,
        caller: Caller,
        changes: DonorProfileChanges,
    ) -> Result<DonorProfileRecord, AppError> {
        let profile = self.load_for_user(&caller.user_id).await?;
        self.apply(caller, profile, changes).await
    }

    pub async fn search(
        &self,
        filters: DonorSearch,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<DonorProfileRecord>, AppError> {
        let found = self.profile_dao.search(filters, page, page_size).await?;

        let owner_ids = found.data.iter().map(|profile| profile.user_id).collect();
        let mut owners: HashMap<Uuid, user::Model> = self
            .user_service
            .find_by_ids(owner_ids)
            .await?
            .into_iter()
            .map(|owner| (owner.id, owner))
            .collect();

        let data = found
            .data
            .into_iter()
            .filter_map(|profile| match owners.remove(&profile.user_id) {
                Some(owner) => Some(DonorProfileRecord { profile, owner }),
                None => {
                    tracing::warn!(profile_id = %profile.id, "donor profile without owner");
                    None
                }
            })
            .collect();

        Ok(PaginatedResponse {
            data,
            page: found.page,
            page_size: found.page_size,
            has_next: found.has_next,
        })
    }

    async fn apply(
        &self,
        caller: Caller,
        profile: donor_profile::Model,
        changes: DonorProfileChanges,
    ) -> Result<DonorProfileRecord, AppError> {
        if profile.user_id != caller.user_id && !caller.is_admin {
            return Err(AppError::forbidden(
                "You do not have permission to modify this donor profile",
            ));
        }

        let updated = match self.profile_dao.apply_changes(&profile.id, changes).await {
            Ok(updated) => updated,
            Err(DaoLayerError::NotFound { .. }) => return Err(profile_not_found()),
            Err(err) => return Err(err.into()),
        };
        self.with_owner(updated).await
    }

    async fn load(&self, id: &Uuid) -> Result<donor_profile::Model, AppError> {
        match self.profile_dao.find_by_id(*id).await {
            Ok(profile) => Ok(profile),
            Err(DaoLayerError::NotFound { .. }) => Err(profile_not_found()),
            Err(err) => Err(err.into()),
        }
    }

    async fn load_for_user(&self, user_id: &Uuid) -> Result<donor_profile::Model, AppError> {
        self.profile_dao
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(profile_not_found)
    }

    async fn with_owner(
        &self,
        profile: donor_profile::Model,
    ) -> Result<DonorProfileRecord, AppError> {
        let owner = self.user_service.get(&profile.user_id).await?;
        Ok(DonorProfileRecord { profile, owner })
    }
}

fn profile_not_found() -> AppError {
    AppError::not_found("Donor profile not found")
}
