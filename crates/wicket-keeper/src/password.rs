//! Password hashing with Argon2id
//!
//! Hashes are stored as PHC strings on the credential record. Verification
//! goes through `argon2`'s constant-time comparison; the guard only ever
//! sees the boolean result.
//!
//! The length check applies at provisioning and change time, not at login:
//! login-time format checks would tell an attacker what the policy is.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use zeroize::Zeroizing;

use crate::error::AuthError;

/// Minimum password length, enforced at provisioning and change time
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate a candidate password against the provisioning policy
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

/// Hash a password into a PHC string with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let password_bytes = Zeroizing::new(password.as_bytes().to_vec());

    let hash = Argon2::default()
        .hash_password(&password_bytes, &salt)
        .map_err(|e| AuthError::Hashing(format!("failed to hash password: {}", e)))?
        .to_string();

    Ok(hash)
}

/// Verify a password against a stored PHC string
///
/// A mismatch is `Ok(false)`; only an unparseable stored hash is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| AuthError::Hashing(format!("invalid stored hash: {}", e)))?;

    let password_bytes = Zeroizing::new(password.as_bytes().to_vec());
    Ok(Argon2::default()
        .verify_password(&password_bytes, &parsed_hash)
        .is_ok())
}
