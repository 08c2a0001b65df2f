//! Landmark API library modules.
//!
//! A CRUD service for landmarks, user accounts, photos and ratings. JWT
//! bearer tokens gate every mutation; reads are public. The crate follows a
//! hexagonal layout: `domain` holds entities, auth primitives and repository
//! ports, `inbound::http` adapts Actix requests onto the domain, and
//! `outbound::persistence` implements the ports over PostgreSQL (Diesel) or
//! an in-memory store.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use doc::ApiDoc;
pub use middleware::Correlate;
