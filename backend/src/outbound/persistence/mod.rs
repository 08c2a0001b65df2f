//! Persistence adapters implementing the domain repository ports.
//!
//! Two interchangeable backends:
//!
//! - **PostgreSQL via Diesel**: async `bb8` pooling through `diesel-async`,
//!   embedded migrations, thin adapters translating between row structs and
//!   domain aggregates. Cascade deletes are foreign key rules in the schema.
//! - **In-memory**: a single [`MemoryStore`] implementing every port with
//!   the same foreign-key and cascade semantics, for development without a
//!   database and for integration tests.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) are
//! internal; nothing here leaks Diesel types to the domain.

mod diesel_landmark_repository;
mod diesel_photo_repository;
mod diesel_rating_repository;
mod diesel_user_repository;
mod error_mapping;
mod memory;
mod models;
mod pool;
mod schema;

pub use diesel_landmark_repository::DieselLandmarkRepository;
pub use diesel_photo_repository::DieselPhotoRepository;
pub use diesel_rating_repository::DieselRatingRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use memory::MemoryStore;
pub use pool::{run_migrations, DbPool, PoolConfig, PoolError};
