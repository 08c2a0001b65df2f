//! Photo aggregate.

use super::landmark::LandmarkId;
use super::user::UserId;

/// Validation errors raised when constructing a [`PhotoDraft`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhotoValidationError {
    /// Image URL was missing or blank once trimmed.
    #[error("photo image url must not be empty")]
    EmptyImageUrl,
}

/// A photo of a landmark, owned by the user who uploaded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub id: i32,
    pub image_url: String,
    pub user_id: UserId,
    pub landmark_id: LandmarkId,
}

/// Validated create/replace payload for a photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDraft {
    image_url: String,
    pub landmark_id: LandmarkId,
}

impl PhotoDraft {
    /// Validate and construct a draft.
    pub fn new(
        image_url: impl Into<String>,
        landmark_id: LandmarkId,
    ) -> Result<Self, PhotoValidationError> {
        let image_url = image_url.into();
        if image_url.trim().is_empty() {
            return Err(PhotoValidationError::EmptyImageUrl);
        }
        Ok(Self {
            image_url,
            landmark_id,
        })
    }

    /// Validated image URL.
    pub fn image_url(&self) -> &str {
        self.image_url.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("  ")]
    fn draft_rejects_blank_url(#[case] url: &str) {
        let err = PhotoDraft::new(url, LandmarkId::new(1)).expect_err("blank url");
        assert_eq!(err, PhotoValidationError::EmptyImageUrl);
    }

    #[test]
    fn draft_accepts_url() {
        let draft =
            PhotoDraft::new("https://example.com/p.jpg", LandmarkId::new(7)).expect("valid");
        assert_eq!(draft.image_url(), "https://example.com/p.jpg");
        assert_eq!(draft.landmark_id, LandmarkId::new(7));
    }
}
