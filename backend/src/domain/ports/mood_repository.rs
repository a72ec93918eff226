//! Driven port for the append-only mood log.
use async_trait::async_trait;

use crate::domain::{MoodEntry, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by mood repository adapters.
    pub enum MoodPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "mood repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "mood repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MoodRepository: Send + Sync {
    /// Append an entry.
    async fn insert(&self, entry: &MoodEntry) -> Result<(), MoodPersistenceError>;

    /// Up to `limit` entries for `user_id`, ordered by stored date string
    /// descending.
    async fn recent(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<MoodEntry>, MoodPersistenceError>;

    /// Number of entries recorded by `user_id`.
    async fn count(&self, user_id: &UserId) -> Result<u64, MoodPersistenceError>;
}
