//! Landmark aggregate and its validated draft.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Maximum accepted landmark name length.
pub const LANDMARK_NAME_MAX: usize = 100;

/// Stable numeric landmark identifier assigned by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LandmarkId(i32);

impl LandmarkId {
    /// Wrap a raw database identifier.
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw database value.
    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for LandmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors raised when constructing a [`LandmarkDraft`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LandmarkValidationError {
    /// Name was missing or blank once trimmed.
    #[error("landmark name must not be empty")]
    EmptyName,
    /// Name exceeds [`LANDMARK_NAME_MAX`] characters.
    #[error("landmark name must be at most {LANDMARK_NAME_MAX} characters")]
    NameTooLong,
}

/// A place users publish, photograph and rate.
///
/// The owner is fixed at creation; mutation endpoints compare it against the
/// authenticated principal before writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landmark {
    pub id: LandmarkId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub country: String,
    pub image_url: String,
    pub user_id: UserId,
}

/// Validated create/replace payload for a landmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandmarkDraft {
    name: String,
    pub description: String,
    pub location: String,
    pub country: String,
    pub image_url: String,
}

impl LandmarkDraft {
    /// Validate and construct a draft.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        country: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Result<Self, LandmarkValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LandmarkValidationError::EmptyName);
        }
        if trimmed.chars().count() > LANDMARK_NAME_MAX {
            return Err(LandmarkValidationError::NameTooLong);
        }

        Ok(Self {
            name: trimmed.to_owned(),
            description: description.into(),
            location: location.into(),
            country: country.into(),
            image_url: image_url.into(),
        })
    }

    /// Validated landmark name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn draft_rejects_blank_name(#[case] name: &str) {
        let err = LandmarkDraft::new(name, "d", "l", "c", "u").expect_err("blank name");
        assert_eq!(err, LandmarkValidationError::EmptyName);
    }

    #[test]
    fn draft_rejects_overlong_name() {
        let name = "x".repeat(LANDMARK_NAME_MAX + 1);
        let err = LandmarkDraft::new(name, "d", "l", "c", "u").expect_err("overlong name");
        assert_eq!(err, LandmarkValidationError::NameTooLong);
    }

    #[test]
    fn draft_trims_name() {
        let draft = LandmarkDraft::new("  Eiffel Tower  ", "d", "Paris", "France", "u")
            .expect("valid draft");
        assert_eq!(draft.name(), "Eiffel Tower");
    }
}
