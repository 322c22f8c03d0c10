/// Password Hashing and Verification
///
/// Argon2id hashing over PHC-format strings. The stored hash is
/// self-describing (algorithm, parameters, salt, digest), so verification
/// needs no external parameter storage and parameters can be upgraded
/// without invalidating existing hashes.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;

use crate::error::AppError;

/// Hash a password with Argon2id and a fresh random salt.
///
/// # Errors
/// Returns `Internal` if the hashing backend fails; acceptance policy
/// (length bounds) is enforced by the caller before hashing.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password attempt against a stored PHC hash string.
///
/// A wrong password is `Ok(false)`, not an error; only a malformed stored
/// hash fails.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Malformed password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "pw123";
        let hash = hash_password(password).expect("Failed to hash password");

        assert_ne!(password, hash);
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_verify_password() {
        let password = "pw123";
        let hash = hash_password(password).expect("Failed to hash password");

        let is_valid = verify_password(password, &hash).expect("Failed to verify password");
        assert!(is_valid);
    }

    #[test]
    fn test_verify_wrong_password() {
        let password = "pw123";
        let hash = hash_password(password).expect("Failed to hash password");

        let is_valid = verify_password("pw124", &hash).expect("Failed to verify password");
        assert!(!is_valid);
    }

    #[test]
    fn test_same_password_different_salts() {
        let password = "correct horse battery staple";
        let hash1 = hash_password(password).expect("Failed to hash password");
        let hash2 = hash_password(password).expect("Failed to hash password");

        assert_ne!(hash1, hash2);
        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("pw123", "not-a-phc-string").is_err());
    }
}
