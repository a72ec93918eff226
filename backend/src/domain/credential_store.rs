//! Account registration and authentication service.
//!
//! Implements the [`CredentialService`] driving port on top of any
//! [`UserRepository`]. Argon2 work runs on the blocking pool so request
//! workers are not stalled by hashing.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{CredentialService, UserPersistenceError, UserRepository};
use crate::domain::{
    Error, LoginCredentials, PasswordHashError, PasswordHasher, Registration, User, UserId,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const USERNAME_TAKEN: &str = "Username already exists";
const EMAIL_TAKEN: &str = "Email already exists";

/// Credential service backed by a user repository.
#[derive(Clone)]
pub struct CredentialStore<R> {
    users: Arc<R>,
    hasher: PasswordHasher,
    clock: Arc<dyn Clock>,
}

impl<R> CredentialStore<R> {
    /// Create a service over `users`.
    pub fn new(users: Arc<R>, hasher: PasswordHasher, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername => username_taken(),
        UserPersistenceError::DuplicateEmail => email_taken(),
    }
}

fn username_taken() -> Error {
    Error::invalid_request(USERNAME_TAKEN)
        .with_details(json!({ "field": "username", "code": "duplicate_username" }))
}

fn email_taken() -> Error {
    Error::invalid_request(EMAIL_TAKEN)
        .with_details(json!({ "field": "email", "code": "duplicate_email" }))
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(format!("password hashing failed: {error}"))
}

async fn run_blocking<T, F>(work: F) -> Result<T, Error>
where
    F: FnOnce() -> Result<T, PasswordHashError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| Error::internal(format!("password task failed: {err}")))?
        .map_err(map_hash_error)
}

#[async_trait]
impl<R> CredentialService for CredentialStore<R>
where
    R: UserRepository,
{
    async fn register(&self, registration: &Registration) -> Result<UserId, Error> {
        if self
            .users
            .find_by_username(registration.username())
            .await
            .map_err(map_persistence_error)?
            .is_some()
        {
            return Err(username_taken());
        }
        if self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(map_persistence_error)?
            .is_some()
        {
            return Err(email_taken());
        }

        let hasher = self.hasher.clone();
        let password = zeroize::Zeroizing::new(registration.password().to_owned());
        let password_hash = run_blocking(move || hasher.hash(&password)).await?;

        let user = User::new(
            UserId::random(),
            registration.username().clone(),
            registration.email().clone(),
            password_hash,
            self.clock.utc(),
        );
        self.users
            .insert(&user)
            .await
            .map_err(map_persistence_error)?;

        info!(user_id = %user.id(), "user registered");
        Ok(user.id().clone())
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(user) = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_persistence_error)?
        else {
            info!("login rejected: unknown username");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let hasher = self.hasher.clone();
        let password = zeroize::Zeroizing::new(credentials.password().to_owned());
        let stored = user.password_hash().to_owned();
        let verified = match run_blocking(move || hasher.verify(&password, &stored)).await {
            Ok(verified) => verified,
            Err(err) => {
                // Unparseable stored hashes count as a mismatch.
                warn!(user_id = %user.id(), error = %err, "stored password hash rejected");
                false
            }
        };

        if !verified {
            info!(user_id = %user.id(), "login rejected: password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        info!(user_id = %user.id(), "user authenticated");
        Ok(user)
    }

    async fn lookup(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::{Email, ErrorCode, Username};
    use crate::test_support::{FixedClock, cheap_hasher};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        ))
    }

    fn service(repo: MockUserRepository) -> CredentialStore<MockUserRepository> {
        CredentialStore::new(Arc::new(repo), cheap_hasher(), clock())
    }

    fn stored_user(password: &str) -> User {
        User::new(
            UserId::random(),
            Username::new("alice").expect("username"),
            Email::new("alice@example.com").expect("email"),
            cheap_hasher().hash(password).expect("hash"),
            Utc::now(),
        )
    }

    fn registration() -> Registration {
        Registration::try_from_parts("alice", "alice@example.com", "pw").expect("valid")
    }

    #[tokio::test]
    async fn register_hashes_password_and_stamps_creation_time() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().return_once(|_| Ok(None));
        repo.expect_find_by_email().return_once(|_| Ok(None));
        repo.expect_insert()
            .withf(|user| {
                user.password_hash().starts_with("$argon2id$")
                    && user.password_hash() != "pw"
                    && user.created_at().timestamp() == 1_772_355_600
            })
            .times(1)
            .return_once(|_| Ok(()));

        let id = service(repo)
            .register(&registration())
            .await
            .expect("registered");
        assert!(!id.as_ref().is_empty());
    }

    #[tokio::test]
    async fn register_rejects_taken_username_before_checking_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .return_once(|_| Ok(Some(stored_user("other"))));
        repo.expect_find_by_email().never();
        repo.expect_insert().never();

        let err = service(repo)
            .register(&registration())
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Username already exists");
    }

    #[tokio::test]
    async fn register_rejects_taken_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().return_once(|_| Ok(None));
        repo.expect_find_by_email()
            .return_once(|_| Ok(Some(stored_user("other"))));
        repo.expect_insert().never();

        let err = service(repo)
            .register(&registration())
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Email already exists");
    }

    #[rstest]
    #[case(UserPersistenceError::duplicate_username(), "Username already exists")]
    #[case(UserPersistenceError::duplicate_email(), "Email already exists")]
    #[tokio::test]
    async fn insert_race_maps_to_duplicate_errors(
        #[case] failure: UserPersistenceError,
        #[case] message: &str,
    ) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().return_once(|_| Ok(None));
        repo.expect_find_by_email().return_once(|_| Ok(None));
        repo.expect_insert().return_once(move |_| Err(failure));

        let err = service(repo)
            .register(&registration())
            .await
            .expect_err("race lost");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), message);
    }

    #[rstest]
    #[case(UserPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(UserPersistenceError::query("syntax"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn repository_failures_are_mapped(
        #[case] failure: UserPersistenceError,
        #[case] code: ErrorCode,
    ) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().return_once(move |_| Err(failure));

        let err = service(repo)
            .lookup(&UserId::random())
            .await
            .expect_err("failure");
        assert_eq!(err.code(), code);
    }

    #[rstest]
    #[case("pw", true)]
    #[case("wrong", false)]
    #[tokio::test]
    async fn authenticate_checks_password(#[case] attempt: &str, #[case] accepted: bool) {
        let user = stored_user("pw");
        let expected_id = user.id().clone();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .return_once(move |_| Ok(Some(user)));

        let creds = LoginCredentials::try_from_parts("alice", attempt).expect("valid");
        match (accepted, service(repo).authenticate(&creds).await) {
            (true, Ok(user)) => assert_eq!(user.id(), &expected_id),
            (false, Err(err)) => {
                assert_eq!(err.code(), ErrorCode::Unauthorized);
                assert_eq!(err.message(), "Invalid credentials");
            }
            (_, other) => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn authenticate_unknown_user_is_indistinguishable_from_bad_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().return_once(|_| Ok(None));

        let creds = LoginCredentials::try_from_parts("ghost", "pw").expect("valid");
        let err = service(repo)
            .authenticate(&creds)
            .await
            .expect_err("unknown");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "Invalid credentials");
    }

    #[tokio::test]
    async fn lookup_missing_user_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().return_once(|_| Ok(None));

        let err = service(repo)
            .lookup(&UserId::random())
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
