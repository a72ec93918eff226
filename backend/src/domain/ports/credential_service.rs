//! Driving port for registration, login and session-subject lookup.
//!
//! Inbound adapters call this port without knowing how accounts are stored
//! or how passwords are hashed.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Create an account and return its new identifier.
    ///
    /// Fails with `InvalidRequest` when the username or email is taken.
    async fn register(&self, registration: &Registration) -> Result<UserId, Error>;

    /// Check credentials and return the matching account.
    ///
    /// Unknown usernames and wrong passwords fail identically with
    /// `Unauthorized`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;

    /// Load an account by id, failing with `NotFound` when it is gone.
    async fn lookup(&self, user_id: &UserId) -> Result<User, Error>;
}
