pub mod auth_service;
pub mod context;
pub mod donor_profile_service;
pub mod user_service;

pub use context::ServiceContext;
pub use donor_profile_service::{Caller, DonorProfileDraft, DonorProfileRecord};
