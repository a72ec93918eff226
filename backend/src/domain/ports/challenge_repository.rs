//! Driven port for challenge instances and progress records.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ChallengeId, ChallengeInstance, ProgressRecord, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by challenge repository adapters.
    pub enum ChallengePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "challenge repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "challenge repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChallengeRepository: Send + Sync {
    /// Persist a freshly started instance.
    async fn insert_started(
        &self,
        instance: &ChallengeInstance,
    ) -> Result<(), ChallengePersistenceError>;

    /// Complete the oldest `started` instance of `challenge_id` owned by
    /// `user_id` and record the points it earns.
    ///
    /// The status change and the progress record are written atomically, and
    /// one instance can only ever be completed once even under concurrent
    /// calls. Returns `None` when no started instance exists.
    async fn complete_oldest_started(
        &self,
        user_id: &UserId,
        challenge_id: ChallengeId,
        completed_at: DateTime<Utc>,
    ) -> Result<Option<ProgressRecord>, ChallengePersistenceError>;

    /// All `started` instances owned by `user_id`, oldest first.
    async fn list_started(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ChallengeInstance>, ChallengePersistenceError>;

    /// All progress records for `user_id`, newest first.
    async fn progress_records(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ProgressRecord>, ChallengePersistenceError>;

    /// Number of completed challenges for `user_id`.
    async fn count_completions(&self, user_id: &UserId) -> Result<u64, ChallengePersistenceError>;
}
