//! Account registration, sign-in and bearer-token resolution.
//!
//! Composes the credential hasher, the token signer and the user repository
//! port. Handlers never touch those pieces directly; they hand this service
//! validated payloads and get back a user or a token.

use std::sync::Arc;

use tracing::debug;

use super::auth::{Credentials, Registration};
use super::error::Error;
use super::password::CredentialHasher;
use super::ports::UserRepository;
use super::token::{TokenError, TokenSigner};
use super::user::{NewUser, User};

/// Message returned for any credential failure. Deliberately does not reveal
/// whether the username or the password was wrong.
const BAD_CREDENTIALS: &str = "invalid username or password";

/// Authentication service shared by the HTTP handlers.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: CredentialHasher,
    signer: TokenSigner,
}

impl AuthService {
    /// Assemble the service from its collaborators.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: CredentialHasher,
        signer: TokenSigner,
    ) -> Self {
        Self {
            users,
            hasher,
            signer,
        }
    }

    /// Register a new account.
    ///
    /// Rejects an already-taken username or email with `Conflict` before
    /// hashing. The email uniqueness is additionally enforced by the store,
    /// so a racing duplicate still surfaces as `Conflict`.
    pub async fn signup(&self, registration: &Registration) -> Result<User, Error> {
        if self
            .users
            .first_by_username(registration.username())
            .await?
            .is_some()
        {
            return Err(Error::conflict("username is already taken"));
        }
        if self
            .users
            .find_by_email(registration.email())
            .await?
            .is_some()
        {
            return Err(Error::conflict("email is already taken"));
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(|e| Error::internal(e.to_string()))?;

        let user = self
            .users
            .insert(&NewUser {
                username: registration.username().to_owned(),
                email: registration.email().to_owned(),
                password_hash,
            })
            .await?;

        debug!(user_id = %user.id, "account registered");
        Ok(user)
    }

    /// Exchange credentials for a signed bearer token.
    pub async fn signin(&self, credentials: &Credentials) -> Result<String, Error> {
        let Some(user) = self.users.first_by_username(credentials.username()).await? else {
            return Err(Error::unauthorized(BAD_CREDENTIALS));
        };

        if !self.hasher.verify(credentials.password(), &user.password_hash) {
            return Err(Error::unauthorized(BAD_CREDENTIALS));
        }

        self.signer
            .issue(&user.username)
            .map_err(|e| Error::internal(e.to_string()))
    }

    /// Verify a bearer token and resolve its subject to a user record.
    ///
    /// The authenticated principal for every protected endpoint comes from
    /// here.
    pub async fn resolve_bearer(&self, token: &str) -> Result<User, Error> {
        let claims = self.signer.verify(token).map_err(|err| match err {
            TokenError::Expired => Error::unauthorized("token expired"),
            TokenError::InvalidSignature => Error::unauthorized("invalid token signature"),
            TokenError::Malformed => Error::unauthorized("malformed token"),
            TokenError::Signing { message } => Error::internal(message),
        })?;

        self.users
            .first_by_username(&claims.sub)
            .await?
            .ok_or_else(|| Error::unauthorized("user not found"))
    }
}

#[cfg(test)]
mod tests {
    //! Service behaviour against a stubbed user repository.

    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::ports::RepositoryError;
    use crate::domain::token::DEFAULT_TTL;
    use crate::domain::user::{UserId, UserUpdate};
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[derive(Default)]
    struct StubState {
        users: Vec<User>,
        fail: Option<RepositoryError>,
    }

    #[derive(Default)]
    struct StubUserRepository {
        state: Mutex<StubState>,
    }

    impl StubUserRepository {
        fn set_failure(&self, failure: RepositoryError) {
            self.state.lock().expect("state lock").fail = Some(failure);
        }

        fn guard(&self) -> Result<std::sync::MutexGuard<'_, StubState>, RepositoryError> {
            let state = self.state.lock().expect("state lock");
            if let Some(failure) = state.fail.clone() {
                return Err(failure);
            }
            Ok(state)
        }
    }

    #[async_trait]
    impl UserRepository for StubUserRepository {
        async fn insert(&self, user: &NewUser) -> Result<User, RepositoryError> {
            let mut state = self.guard()?;
            let id = UserId::new(i32::try_from(state.users.len()).expect("small") + 1);
            let user = User {
                id,
                username: user.username.clone(),
                email: user.email.clone(),
                password_hash: user.password_hash.clone(),
            };
            state.users.push(user.clone());
            Ok(user)
        }

        async fn list(&self) -> Result<Vec<User>, RepositoryError> {
            Ok(self.guard()?.users.clone())
        }

        async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
            Ok(self.guard()?.users.iter().find(|u| u.id == id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
            Ok(self
                .guard()?
                .users
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn list_by_username(
            &self,
            username: &str,
        ) -> Result<Vec<User>, RepositoryError> {
            Ok(self
                .guard()?
                .users
                .iter()
                .filter(|u| u.username == username)
                .cloned()
                .collect())
        }

        async fn first_by_username(
            &self,
            username: &str,
        ) -> Result<Option<User>, RepositoryError> {
            Ok(self
                .guard()?
                .users
                .iter()
                .find(|u| u.username == username)
                .cloned())
        }

        async fn update(
            &self,
            _id: UserId,
            _update: &UserUpdate,
        ) -> Result<Option<User>, RepositoryError> {
            unimplemented!("not exercised by auth tests")
        }

        async fn delete(&self, _id: UserId) -> Result<bool, RepositoryError> {
            unimplemented!("not exercised by auth tests")
        }
    }

    fn service() -> (Arc<StubUserRepository>, AuthService) {
        let repository = Arc::new(StubUserRepository::default());
        let signer = TokenSigner::new(
            b"test-secret-that-is-at-least-32-characters".to_vec(),
            DEFAULT_TTL,
        )
        .expect("valid signer");
        let service = AuthService::new(repository.clone(), CredentialHasher::new(), signer);
        (repository, service)
    }

    fn registration(username: &str, email: &str, password: &str) -> Registration {
        Registration::try_from_parts(username, email, password).expect("valid registration")
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials::try_from_parts(username, password).expect("valid credentials")
    }

    #[tokio::test]
    async fn signup_then_signin_resolves_back_to_the_user() {
        let (_, service) = service();

        let user = service
            .signup(&registration("alice", "alice@x.com", "pw123"))
            .await
            .expect("signup succeeds");
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "pw123");

        let token = service
            .signin(&credentials("alice", "pw123"))
            .await
            .expect("signin succeeds");

        let principal = service
            .resolve_bearer(&token)
            .await
            .expect("token resolves");
        assert_eq!(principal.id, user.id);
    }

    #[rstest]
    #[case("alice", "alice2@x.com", "username is already taken")]
    #[case("alice2", "alice@x.com", "email is already taken")]
    #[tokio::test]
    async fn signup_rejects_duplicates(
        #[case] username: &str,
        #[case] email: &str,
        #[case] expected: &str,
    ) {
        let (_, service) = service();
        service
            .signup(&registration("alice", "alice@x.com", "pw123"))
            .await
            .expect("first signup succeeds");

        let err = service
            .signup(&registration(username, email, "pw456"))
            .await
            .expect_err("duplicate must fail");
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, expected);
    }

    #[rstest]
    #[case("alice", "wrong-password")]
    #[case("nobody", "pw123")]
    #[tokio::test]
    async fn signin_rejects_bad_credentials(#[case] username: &str, #[case] password: &str) {
        let (_, service) = service();
        service
            .signup(&registration("alice", "alice@x.com", "pw123"))
            .await
            .expect("signup succeeds");

        let err = service
            .signin(&credentials(username, password))
            .await
            .expect_err("bad credentials must fail");
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.message, BAD_CREDENTIALS);
    }

    #[tokio::test]
    async fn resolve_bearer_rejects_unknown_subject() {
        let (_, service) = service();
        let signer = TokenSigner::new(
            b"test-secret-that-is-at-least-32-characters".to_vec(),
            DEFAULT_TTL,
        )
        .expect("valid signer");
        let token = signer.issue("ghost").expect("issuing succeeds");

        let err = service
            .resolve_bearer(&token)
            .await
            .expect_err("unknown subject must fail");
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.message, "user not found");
    }

    #[tokio::test]
    async fn resolve_bearer_rejects_garbage() {
        let (_, service) = service();
        let err = service
            .resolve_bearer("not-a-token")
            .await
            .expect_err("garbage must fail");
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case(RepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(RepositoryError::query("broken"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn signin_maps_repository_failures(
        #[case] failure: RepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let (repository, service) = service();
        repository.set_failure(failure);

        let err = service
            .signin(&credentials("alice", "pw123"))
            .await
            .expect_err("repository failures surface");
        assert_eq!(err.code, expected);
    }
}
