//! Repository ports defining the edges of the hexagon.
//!
//! One explicit trait per entity type; adapters (Diesel/PostgreSQL and the
//! in-memory store) map their failures into the [`RepositoryError`] taxonomy
//! instead of returning `anyhow::Result`.

use async_trait::async_trait;
use thiserror::Error as ThisError;

use super::error::Error;
use super::landmark::{Landmark, LandmarkDraft, LandmarkId};
use super::photo::{Photo, PhotoDraft};
use super::rating::{Rating, RatingDraft};
use super::user::{NewUser, User, UserId, UserUpdate};

/// Errors surfaced by repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum RepositoryError {
    /// Connectivity or pool checkout failures.
    #[error("repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("repository query failed: {message}")]
    Query { message: String },
    /// A unique constraint was violated.
    #[error("{message}")]
    Conflict { message: String },
    /// A referenced parent row does not exist.
    #[error("{message}")]
    ForeignKey { message: String },
}

impl RepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for unique constraint violations.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Helper for missing referenced rows.
    pub fn foreign_key(message: impl Into<String>) -> Self {
        Self::ForeignKey {
            message: message.into(),
        }
    }
}

impl From<RepositoryError> for Error {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Connection { message } => {
                tracing::error!(%message, "repository connection failure");
                Error::service_unavailable("database unavailable")
            }
            RepositoryError::Query { message } => {
                tracing::error!(%message, "repository query failure");
                Error::internal(message)
            }
            RepositoryError::Conflict { message } => Error::conflict(message),
            RepositoryError::ForeignKey { message } => Error::not_found(message),
        }
    }
}

/// Persistence port for user accounts.
///
/// `delete` cascades to the user's landmarks, photos and ratings.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &NewUser) -> Result<User, RepositoryError>;
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    /// All accounts sharing a (non-unique) username.
    async fn list_by_username(&self, username: &str) -> Result<Vec<User>, RepositoryError>;
    /// The first account with the given username, by ascending id. Token
    /// subjects resolve through this.
    async fn first_by_username(&self, username: &str)
        -> Result<Option<User>, RepositoryError>;
    /// Replace profile fields; `None` when the user does not exist.
    async fn update(
        &self,
        id: UserId,
        update: &UserUpdate,
    ) -> Result<Option<User>, RepositoryError>;
    /// Remove the account and everything it owns; `false` when absent.
    async fn delete(&self, id: UserId) -> Result<bool, RepositoryError>;
}

/// Persistence port for landmarks.
///
/// `delete` cascades to the landmark's photos and ratings.
#[async_trait]
pub trait LandmarkRepository: Send + Sync {
    async fn insert(
        &self,
        owner: UserId,
        draft: &LandmarkDraft,
    ) -> Result<Landmark, RepositoryError>;
    async fn list(&self) -> Result<Vec<Landmark>, RepositoryError>;
    async fn find_by_id(&self, id: LandmarkId) -> Result<Option<Landmark>, RepositoryError>;
    async fn list_by_user(&self, user: UserId) -> Result<Vec<Landmark>, RepositoryError>;
    async fn list_by_country(&self, country: &str)
        -> Result<Vec<Landmark>, RepositoryError>;
    /// Replace landmark fields; the owner is immutable. `None` when absent.
    async fn update(
        &self,
        id: LandmarkId,
        draft: &LandmarkDraft,
    ) -> Result<Option<Landmark>, RepositoryError>;
    async fn delete(&self, id: LandmarkId) -> Result<bool, RepositoryError>;
}

/// Persistence port for photos.
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    async fn insert(&self, owner: UserId, draft: &PhotoDraft)
        -> Result<Photo, RepositoryError>;
    async fn list(&self) -> Result<Vec<Photo>, RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Photo>, RepositoryError>;
    async fn list_by_user(&self, user: UserId) -> Result<Vec<Photo>, RepositoryError>;
    async fn list_by_landmark(
        &self,
        landmark: LandmarkId,
    ) -> Result<Vec<Photo>, RepositoryError>;
    async fn update(
        &self,
        id: i32,
        draft: &PhotoDraft,
    ) -> Result<Option<Photo>, RepositoryError>;
    async fn delete(&self, id: i32) -> Result<bool, RepositoryError>;
}

/// Persistence port for ratings.
#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn insert(
        &self,
        owner: UserId,
        draft: &RatingDraft,
    ) -> Result<Rating, RepositoryError>;
    async fn list(&self) -> Result<Vec<Rating>, RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Rating>, RepositoryError>;
    async fn list_by_user(&self, user: UserId) -> Result<Vec<Rating>, RepositoryError>;
    async fn list_by_landmark(
        &self,
        landmark: LandmarkId,
    ) -> Result<Vec<Rating>, RepositoryError>;
    async fn update(
        &self,
        id: i32,
        draft: &RatingDraft,
    ) -> Result<Option<Rating>, RepositoryError>;
    async fn delete(&self, id: i32) -> Result<bool, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(RepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(RepositoryError::query("broken"), ErrorCode::InternalError)]
    #[case(RepositoryError::conflict("email taken"), ErrorCode::Conflict)]
    #[case(RepositoryError::foreign_key("no landmark"), ErrorCode::NotFound)]
    fn repository_errors_map_to_domain_codes(
        #[case] err: RepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mapped = Error::from(err);
        assert_eq!(mapped.code, expected);
    }
}
