//! User account aggregate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable numeric user identifier assigned by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw database identifier.
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw database value.
    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registered account.
///
/// ## Invariants
/// - `email` is unique across the store.
/// - `password_hash` is a PHC-format digest, never a plaintext password.
///
/// Usernames are not unique; the sign-up pre-check rejects duplicates, but
/// racing registrations can still produce two users sharing a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Validated data for inserting a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Replacement profile fields for an existing account.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub username: String,
    pub email: String,
}
