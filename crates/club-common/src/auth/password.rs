//! Password hashing and verification
//!
//! Argon2id with per-hash random salts.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a stored hash
///
/// # Errors
/// Returns an error if the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Stateless handle so services can depend on hashing without free functions
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordService;

impl PasswordService {
    /// Verify and map a mismatch to `InvalidCredentials`
    ///
    /// # Errors
    /// Returns `AppError::InvalidCredentials` if the password doesn't match
    pub fn verify_or_reject(self, password: &str, hash: &str) -> Result<(), AppError> {
        if verify_password(password, hash)? {
            Ok(())
        } else {
            Err(AppError::InvalidCredentials)
        }
    }
}

/// Password rules: 8 to 128 characters with at least one uppercase letter,
/// one lowercase letter and one digit
///
/// # Errors
/// Returns a `password` field error describing the first rule broken
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    let reject = |message: &str| Err(AppError::invalid_field("password", message));

    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return reject("must be at least 8 characters long");
    }
    if len > MAX_PASSWORD_LEN {
        return reject("must be at most 128 characters long");
    }
    if !password.chars().any(char::is_uppercase) {
        return reject("must contain at least one uppercase letter");
    }
    if !password.chars().any(char::is_lowercase) {
        return reject("must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return reject("must contain at least one digit");
    }

    Ok(())
}
