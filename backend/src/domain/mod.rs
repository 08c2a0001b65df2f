//! Domain primitives, aggregates and ports.
//!
//! Everything here is transport agnostic: entities with their invariants,
//! the authentication primitives (hashing, tokens, ownership) and the
//! repository traits the adapters implement. Inbound adapters map
//! [`Error`] to protocol responses; outbound adapters map their failures
//! into [`ports::RepositoryError`].

pub mod auth;
pub mod auth_service;
pub mod error;
pub mod landmark;
pub mod ownership;
pub mod password;
pub mod photo;
pub mod ports;
pub mod rating;
pub mod token;
pub mod user;

pub use self::auth::{validate_profile, Credentials, CredentialValidationError, Registration};
pub use self::auth_service::AuthService;
pub use self::error::{Error, ErrorCode};
pub use self::landmark::{Landmark, LandmarkDraft, LandmarkId, LandmarkValidationError};
pub use self::ownership::require_owner;
pub use self::password::CredentialHasher;
pub use self::photo::{Photo, PhotoDraft, PhotoValidationError};
pub use self::rating::{Rating, RatingDraft, RatingValidationError, Score};
pub use self::token::{TokenSigner, DEFAULT_TTL};
pub use self::user::{NewUser, User, UserId, UserUpdate};

/// Convenient result alias for fallible domain operations.
pub type ApiResult<T> = Result<T, Error>;
