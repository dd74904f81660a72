//! Argon2id password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    /// Hashing failed (bad parameters or RNG failure).
    #[error("password hashing failed")]
    Hash,

    /// The stored value is not a PHC hash string.
    #[error("stored password hash is malformed")]
    MalformedHash,

    /// The password does not match the hash.
    #[error("password does not match")]
    Mismatch,
}

/// Hash a password using Argon2id with a random salt.
///
/// # Errors
///
/// Returns `PasswordError::Hash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::Hash)
}

/// Verify a password against a stored hash.
///
/// # Errors
///
/// Returns `PasswordError::Mismatch` for a wrong password and
/// `PasswordError::MalformedHash` if `hash` cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::MalformedHash)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::Mismatch)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_differs_from_plaintext_and_verifies() {
        let hash = hash_password("open-sesame").unwrap();
        assert_ne!(hash, "open-sesame");
        assert!(hash.starts_with("$argon2id$"));
        assert_eq!(verify_password("open-sesame", &hash), Ok(()));
    }

    #[test]
    fn test_wrong_password_is_mismatch() {
        let hash = hash_password("open-sesame").unwrap();
        assert_eq!(
            verify_password("close-sesame", &hash),
            Err(PasswordError::Mismatch)
        );
    }

    #[test]
    fn test_salts_are_random() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_is_malformed() {
        assert_eq!(
            verify_password("anything", "not-a-hash"),
            Err(PasswordError::MalformedHash)
        );
    }
}
