//! Driving port for the challenge lifecycle and progress aggregation.
use async_trait::async_trait;

use crate::domain::{
    ChallengeId, ChallengeInstance, Error, ProgressRecord, ProgressSummary, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChallengeService: Send + Sync {
    /// Start a new instance. Repeated starts create further instances.
    async fn start(
        &self,
        user_id: &UserId,
        challenge_id: ChallengeId,
    ) -> Result<ChallengeInstance, Error>;

    /// Complete one started instance and award its points.
    ///
    /// Fails with `NotFound` when there is nothing left to complete.
    async fn complete(
        &self,
        user_id: &UserId,
        challenge_id: ChallengeId,
    ) -> Result<ProgressRecord, Error>;

    /// Points, completions and active challenges for `user_id`.
    async fn summary(&self, user_id: &UserId) -> Result<ProgressSummary, Error>;
}
