//! Bearer token issuance and verification.
//!
//! Compact HS256 JWTs carrying `{sub, iat, exp}` where the subject is the
//! account username. Tokens are stateless: validity is determined purely by
//! the signature and the expiry check against current time, with no
//! revocation list. Expiry is checked with zero leeway.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Minimum accepted signing secret length in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Default token lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Claim set embedded in every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account username.
    pub sub: String,
    /// Issued at (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds).
    pub exp: i64,
}

/// Error raised when constructing a [`TokenSigner`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenConfigError {
    /// Secret is missing or shorter than [`MIN_SECRET_BYTES`].
    #[error("signing secret must be at least {MIN_SECRET_BYTES} bytes")]
    WeakSecret,
}

/// Distinguishable token failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Signature does not match the configured secret.
    #[error("invalid token signature")]
    InvalidSignature,
    /// Current time is past the embedded expiry.
    #[error("token expired")]
    Expired,
    /// Token is not a decodable JWT.
    #[error("malformed token")]
    Malformed,
    /// Encoding failed; indicates a configuration problem, not bad input.
    #[error("token signing failed: {message}")]
    Signing { message: String },
}

/// Issues and verifies signed bearer tokens.
///
/// The secret and lifetime are injected at construction; nothing here reads
/// the process environment.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use landmark_api::domain::TokenSigner;
///
/// let signer = TokenSigner::new(
///     b"an-operator-supplied-secret-of-32b!".to_vec(),
///     Duration::from_secs(1800),
/// )
/// .unwrap();
/// let token = signer.issue("alice").unwrap();
/// assert_eq!(signer.verify(&token).unwrap().sub, "alice");
/// ```
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl TokenSigner {
    /// Construct a signer from an operator-supplied secret and lifetime.
    pub fn new(secret: Vec<u8>, ttl: Duration) -> Result<Self, TokenConfigError> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(TokenConfigError::WeakSecret);
        }
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Ok(Self {
            encoding: EncodingKey::from_secret(&secret),
            decoding: DecodingKey::from_secret(&secret),
            ttl_secs,
        })
    }

    /// Issue a token for the given subject, expiring `ttl` from now.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now().timestamp())
    }

    fn issue_at(&self, subject: &str, now: i64) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_owned(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            TokenError::Signing {
                message: e.to_string(),
            }
        })
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|err| {
                use jsonwebtoken::errors::ErrorKind;
                match err.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        TokenError::InvalidSignature
                    }
                    _ => TokenError::Malformed,
                }
            })
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keys are secret material; expose only the lifetime.
        f.debug_struct("TokenSigner")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SECRET: &[u8] = b"test-secret-that-is-at-least-32-characters";

    fn signer() -> TokenSigner {
        TokenSigner::new(SECRET.to_vec(), DEFAULT_TTL).expect("valid signer")
    }

    #[test]
    fn issue_then_verify_round_trips() {
        let signer = signer();
        let token = signer.issue("alice").expect("issuing succeeds");
        let claims = signer.verify(&token).expect("verification succeeds");
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn expired_token_is_rejected() {
        let signer = signer();
        let past = Utc::now().timestamp() - 3600;
        let token = signer.issue_at("alice", past).expect("issuing succeeds");
        let err = signer.verify(&token).expect_err("stale token must fail");
        assert_eq!(err, TokenError::Expired);
    }

    #[test]
    fn token_valid_just_inside_ttl() {
        let signer = signer();
        // Issued 29 minutes ago with a 30 minute ttl: still valid.
        let recent = Utc::now().timestamp() - 29 * 60;
        let token = signer.issue_at("alice", recent).expect("issuing succeeds");
        assert!(signer.verify(&token).is_ok());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let signer = signer();
        let other = TokenSigner::new(
            b"different-secret-that-is-also-32-chars!".to_vec(),
            DEFAULT_TTL,
        )
        .expect("valid signer");
        let token = signer.issue("alice").expect("issuing succeeds");
        let err = other.verify(&token).expect_err("foreign token must fail");
        assert_eq!(err, TokenError::InvalidSignature);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let signer = signer();
        let token = signer.issue("alice").expect("issuing succeeds");
        let mut tampered = token.clone();
        // Flip a character in the payload segment.
        let mid = token.len() / 2;
        let replacement = if token.as_bytes()[mid] == b'A' { "B" } else { "A" };
        tampered.replace_range(mid..=mid, replacement);
        assert!(signer.verify(&tampered).is_err());
    }

    #[rstest]
    #[case("")]
    #[case("not-a-token")]
    #[case("a.b")]
    fn garbage_is_malformed(#[case] token: &str) {
        let err = signer().verify(token).expect_err("garbage must fail");
        assert_eq!(err, TokenError::Malformed);
    }

    #[test]
    fn short_secret_is_rejected() {
        let err = TokenSigner::new(b"short".to_vec(), DEFAULT_TTL)
            .expect_err("weak secret must fail");
        assert_eq!(err, TokenConfigError::WeakSecret);
    }
}
