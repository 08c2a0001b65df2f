//! Authentication payload primitives.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use zeroize::Zeroizing;

use super::user::UserUpdate;

/// Maximum accepted username length.
pub const USERNAME_MAX: usize = 30;
/// Maximum accepted email length.
pub const EMAIL_MAX: usize = 100;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only; deliverability is not this layer's concern.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Domain error returned when sign-in or sign-up payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username exceeds [`USERNAME_MAX`] characters.
    #[error("username must be at most {USERNAME_MAX} characters")]
    UsernameTooLong,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Email does not look like an address.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Email exceeds [`EMAIL_MAX`] characters.
    #[error("email must be at most {EMAIL_MAX} characters")]
    EmailTooLong,
}

fn validate_username(username: &str) -> Result<String, CredentialValidationError> {
    let normalized = username.trim();
    if normalized.is_empty() {
        return Err(CredentialValidationError::EmptyUsername);
    }
    if normalized.chars().count() > USERNAME_MAX {
        return Err(CredentialValidationError::UsernameTooLong);
    }
    Ok(normalized.to_owned())
}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty but keeps caller-provided whitespace to avoid
///   surprising credential comparisons.
///
/// # Examples
/// ```
/// use landmark_api::domain::Credentials;
///
/// let creds = Credentials::try_from_parts("alice", "pw123").unwrap();
/// assert_eq!(creds.username(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let username = validate_username(username)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: String,
    email: String,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let username = validate_username(username)?;

        let email = email.trim();
        if email.chars().count() > EMAIL_MAX {
            return Err(CredentialValidationError::EmailTooLong);
        }
        if !email_regex().is_match(email) {
            return Err(CredentialValidationError::InvalidEmail);
        }

        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }

        Ok(Self {
            username,
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested username.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Normalised email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Plaintext password awaiting hashing.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validate replacement profile fields for an existing account.
pub fn validate_profile(
    username: &str,
    email: &str,
) -> Result<UserUpdate, CredentialValidationError> {
    let username = validate_username(username)?;

    let email = email.trim();
    if email.chars().count() > EMAIL_MAX {
        return Err(CredentialValidationError::EmailTooLong);
    }
    if !email_regex().is_match(email) {
        return Err(CredentialValidationError::InvalidEmail);
    }

    Ok(UserUpdate {
        username,
        email: email.to_owned(),
    })
}

impl fmt::Display for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never include the password in log output.
        write!(f, "{} <{}>", self.username, self.email)
    }
}
