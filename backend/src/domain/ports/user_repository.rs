//! Driven port for account persistence.
use async_trait::async_trait;

use crate::domain::{Email, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already holds the username.
        DuplicateUsername => "username already exists",
        /// Another account already holds the email address.
        DuplicateEmail => "email already exists",
    }
}

/// Account storage with unique usernames and emails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    ///
    /// Adapters must enforce uniqueness themselves and report a clash with
    /// [`UserPersistenceError::DuplicateUsername`] or
    /// [`UserPersistenceError::DuplicateEmail`], so concurrent registrations
    /// cannot both succeed.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by exact username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by exact email address.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;
}
