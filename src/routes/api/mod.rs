pub mod admin;
pub mod auth;
pub mod donors;
pub mod health;
mod router;
pub mod users;

pub use router::router;
