//! Rating aggregate and the bounded score newtype.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::landmark::LandmarkId;
use super::user::UserId;

/// Lowest accepted score.
pub const SCORE_MIN: i32 = 1;
/// Highest accepted score.
pub const SCORE_MAX: i32 = 5;

/// Validation errors raised when constructing a [`Score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RatingValidationError {
    /// Score falls outside `[SCORE_MIN, SCORE_MAX]`.
    #[error("score must be between {SCORE_MIN} and {SCORE_MAX}, got {value}")]
    ScoreOutOfRange { value: i32 },
}

/// Integer score constrained to `[1, 5]`.
///
/// The range is enforced here at write time and mirrored by a database CHECK
/// constraint.
///
/// # Examples
/// ```
/// use landmark_api::domain::Score;
///
/// let score = Score::new(4).expect("in range");
/// assert_eq!(score.value(), 4);
/// assert!(Score::new(6).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(try_from = "i32", into = "i32")]
#[schema(value_type = i32, example = 4)]
pub struct Score(i32);

impl Score {
    /// Validate and construct a score.
    pub fn new(value: i32) -> Result<Self, RatingValidationError> {
        if !(SCORE_MIN..=SCORE_MAX).contains(&value) {
            return Err(RatingValidationError::ScoreOutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Raw integer value.
    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Score> for i32 {
    fn from(value: Score) -> Self {
        value.0
    }
}

impl TryFrom<i32> for Score {
    type Error = RatingValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A user's score for a landmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rating {
    pub id: i32,
    pub score: Score,
    pub user_id: UserId,
    pub landmark_id: LandmarkId,
}

/// Validated create/replace payload for a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingDraft {
    pub score: Score,
    pub landmark_id: LandmarkId,
}
