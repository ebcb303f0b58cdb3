pub mod prelude {
    pub use super::blood_group::BloodGroup;
    pub use super::donor_profile::Entity as DonorProfile;
    pub use super::refresh_token::Entity as RefreshToken;
    pub use super::user::Entity as User;
}

pub mod blood_group;
pub mod donor_profile;
pub mod refresh_token;
pub mod user;

pub use blood_group::{BloodGroup, InvalidBloodGroup};
