//! One-way salted credential hashing.
//!
//! Argon2id in PHC string format. Each hash call draws a fresh 16-byte salt,
//! so hashing the same password twice yields different digests; the salt is
//! embedded in the digest and recovered during verification.

use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};
use password_hash::{PasswordHash, SaltString};

/// Error raised when a digest cannot be produced.
#[derive(Debug, Clone, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    message: String,
}

impl PasswordHashError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Hashes and verifies account passwords.
///
/// # Examples
/// ```
/// use landmark_api::domain::CredentialHasher;
///
/// let hasher = CredentialHasher::new();
/// let digest = hasher.hash("pw123").unwrap();
/// assert!(hasher.verify("pw123", &digest));
/// assert!(!hasher.verify("other", &digest));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialHasher;

impl CredentialHasher {
    /// Create a hasher with the default Argon2id parameters.
    pub fn new() -> Self {
        Self
    }

    /// Produce a salted PHC digest for the given plaintext.
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        let mut salt_bytes = [0u8; 16];
        getrandom::getrandom(&mut salt_bytes)
            .map_err(|e| PasswordHashError::new(e.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| PasswordHashError::new(e.to_string()))?;

        let digest = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::new(e.to_string()))?
            .to_string();
        Ok(digest)
    }

    /// Check a plaintext against a stored digest.
    ///
    /// Returns `false` on mismatch and on digests that fail to parse; it
    /// never panics on malformed input.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("pw123")]
    #[case("")]
    #[case("correct horse battery staple")]
    fn hash_then_verify_round_trips(#[case] plaintext: &str) {
        let hasher = CredentialHasher::new();
        let digest = hasher.hash(plaintext).expect("hashing succeeds");
        assert!(hasher.verify(plaintext, &digest));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = CredentialHasher::new();
        let digest = hasher.hash("pw123").expect("hashing succeeds");
        assert!(!hasher.verify("pw124", &digest));
    }

    #[test]
    fn same_password_hashes_differently() {
        let hasher = CredentialHasher::new();
        let first = hasher.hash("pw123").expect("hashing succeeds");
        let second = hasher.hash("pw123").expect("hashing succeeds");
        assert_ne!(first, second);
    }

    #[test]
    fn verify_tolerates_malformed_digest() {
        let hasher = CredentialHasher::new();
        assert!(!hasher.verify("pw123", "not-a-phc-string"));
        assert!(!hasher.verify("pw123", ""));
    }
}
