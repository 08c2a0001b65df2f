//! Mapping from Diesel and pool failures to repository errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::RepositoryError;

use super::pool::PoolError;

/// Map pool failures to repository errors.
pub(crate) fn map_pool_error(error: PoolError) -> RepositoryError {
    match error {
        PoolError::Checkout { message }
        | PoolError::Build { message }
        | PoolError::Migration { message } => RepositoryError::connection(message),
    }
}

/// Map Diesel failures to repository errors.
///
/// Unique violations become `Conflict` (duplicate email on sign-up) and
/// foreign key violations become `ForeignKey` (writes referencing a missing
/// landmark or user). Everything else is a generic query failure; the raw
/// driver message stays in the logs and out of client responses.
pub(crate) fn map_diesel_error(error: DieselError) -> RepositoryError {
    if let DieselError::DatabaseError(kind, info) = &error {
        debug!(?kind, message = info.message(), "diesel operation failed");
    } else {
        debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        );
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            RepositoryError::conflict(match info.constraint_name() {
                Some("users_email_key") => "email is already taken".to_owned(),
                _ => "duplicate value for a unique field".to_owned(),
            })
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            RepositoryError::foreign_key(match info.constraint_name() {
                Some(name) if name.contains("landmark") => {
                    "landmark does not exist".to_owned()
                }
                Some(name) if name.contains("user") => "user does not exist".to_owned(),
                _ => "referenced record does not exist".to_owned(),
            })
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RepositoryError::connection("database connection error")
        }
        DieselError::NotFound => RepositoryError::query("record not found"),
        _ => RepositoryError::query("database error"),
    }
}
