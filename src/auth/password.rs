use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::thread_rng;

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(
            "password",
            format!("Ensure this field has at least {MIN_PASSWORD_LEN} characters."),
        ));
    }

    let salt = SaltString::generate(&mut thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AppError::internal(format!("Password hashing failed: {err}")))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|err| AppError::internal(format!("Invalid password hash: {err}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};

    #[test]
    fn hashes_are_salted_and_verify() {
        let first = hash_password("password123").expect("hash should succeed");
        let second = hash_password("password123").expect("hash should succeed");

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2"));
        assert!(verify_password("password123", &first).expect("hash parses"));
        assert!(!verify_password("password124", &first).expect("hash parses"));
    }

    #[test]
    fn short_passwords_are_rejected() {
        let err = hash_password("short").expect_err("too short");
        assert_eq!(
            err.field_errors().and_then(|errors| errors.get("password")),
            Some("Ensure this field has at least 8 characters.")
        );
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let err = verify_password("password123", "plain-text").expect_err("not a phc string");
        assert!(err.message().starts_with("Invalid password hash:"));
    }
}
