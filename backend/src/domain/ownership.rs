//! Ownership guard for mutation endpoints.

use super::error::Error;
use super::user::UserId;

/// Reject a mutation unless the resource owner is the authenticated
/// principal.
///
/// Called before any write; a `Forbidden` result must leave persistence
/// untouched.
///
/// # Examples
/// ```
/// use landmark_api::domain::{require_owner, UserId};
///
/// assert!(require_owner(UserId::new(1), UserId::new(1)).is_ok());
/// assert!(require_owner(UserId::new(1), UserId::new(2)).is_err());
/// ```
pub fn require_owner(owner: UserId, principal: UserId) -> Result<(), Error> {
    if owner == principal {
        Ok(())
    } else {
        Err(Error::forbidden("you do not own this resource"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;

    #[test]
    fn owner_is_allowed() {
        assert!(require_owner(UserId::new(7), UserId::new(7)).is_ok());
    }

    #[test]
    fn non_owner_is_forbidden() {
        let err = require_owner(UserId::new(7), UserId::new(8)).expect_err("must deny");
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
