//! Challenge lifecycle and progress aggregation service.
//!
//! Starting is permissive: every call creates another `started` instance.
//! Completion consumes the oldest started instance of that challenge, so N
//! starts allow N completions.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{ChallengePersistenceError, ChallengeRepository, ChallengeService};
use crate::domain::{
    ChallengeId, ChallengeInstance, Error, ProgressRecord, ProgressSummary, UserId,
};

const NOTHING_TO_COMPLETE: &str = "Challenge not found or already completed";

#[derive(Clone)]
pub struct ChallengeTracker<R> {
    challenges: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ChallengeTracker<R> {
    pub fn new(challenges: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { challenges, clock }
    }
}

pub(crate) fn map_challenge_error(error: ChallengePersistenceError) -> Error {
    match error {
        ChallengePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("challenge repository unavailable: {message}"))
        }
        ChallengePersistenceError::Query { message } => {
            Error::internal(format!("challenge repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> ChallengeService for ChallengeTracker<R>
where
    R: ChallengeRepository,
{
    async fn start(
        &self,
        user_id: &UserId,
        challenge_id: ChallengeId,
    ) -> Result<ChallengeInstance, Error> {
        let instance = ChallengeInstance::start(user_id.clone(), challenge_id, self.clock.utc());
        self.challenges
            .insert_started(&instance)
            .await
            .map_err(map_challenge_error)?;
        info!(user_id = %user_id, challenge_id = %challenge_id, "challenge started");
        Ok(instance)
    }

    async fn complete(
        &self,
        user_id: &UserId,
        challenge_id: ChallengeId,
    ) -> Result<ProgressRecord, Error> {
        let record = self
            .challenges
            .complete_oldest_started(user_id, challenge_id, self.clock.utc())
            .await
            .map_err(map_challenge_error)?
            .ok_or_else(|| Error::not_found(NOTHING_TO_COMPLETE))?;
        info!(
            user_id = %user_id,
            challenge_id = %challenge_id,
            points = record.points,
            "challenge completed"
        );
        Ok(record)
    }

    async fn summary(&self, user_id: &UserId) -> Result<ProgressSummary, Error> {
        let records = self
            .challenges
            .progress_records(user_id)
            .await
            .map_err(map_challenge_error)?;
        let active = self
            .challenges
            .list_started(user_id)
            .await
            .map_err(map_challenge_error)?;
        Ok(ProgressSummary::from_parts(records, active))
    }
}
