//! Shared HTTP adapter state.
//!
//! Handlers accept this via `actix_web::web::Data` so they depend only on
//! the auth service and the repository ports, and stay testable without a
//! database.

use std::sync::Arc;

use crate::domain::ports::{
    LandmarkRepository, PhotoRepository, RatingRepository, UserRepository,
};
use crate::domain::{AuthService, CredentialHasher, TokenSigner};
use crate::outbound::persistence::{
    DbPool, DieselLandmarkRepository, DieselPhotoRepository, DieselRatingRepository,
    DieselUserRepository, MemoryStore,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<AuthService>,
    pub users: Arc<dyn UserRepository>,
    pub landmarks: Arc<dyn LandmarkRepository>,
    pub photos: Arc<dyn PhotoRepository>,
    pub ratings: Arc<dyn RatingRepository>,
}

impl HttpState {
    /// Wire the handlers to Diesel repositories over the given pool.
    pub fn with_pool(pool: DbPool, signer: TokenSigner) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(DieselUserRepository::new(pool.clone()));
        Self {
            auth: Arc::new(AuthService::new(
                users.clone(),
                CredentialHasher::new(),
                signer,
            )),
            users,
            landmarks: Arc::new(DieselLandmarkRepository::new(pool.clone())),
            photos: Arc::new(DieselPhotoRepository::new(pool.clone())),
            ratings: Arc::new(DieselRatingRepository::new(pool)),
        }
    }

    /// Wire the handlers to a fresh shared [`MemoryStore`].
    ///
    /// Used when no database is configured and by integration tests.
    pub fn in_memory(signer: TokenSigner) -> Self {
        let store = Arc::new(MemoryStore::new());
        let users: Arc<dyn UserRepository> = store.clone();
        Self {
            auth: Arc::new(AuthService::new(
                users.clone(),
                CredentialHasher::new(),
                signer,
            )),
            users,
            landmarks: store.clone(),
            photos: store.clone(),
            ratings: store,
        }
    }
}
