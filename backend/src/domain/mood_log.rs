//! Mood log service implementing [`MoodService`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{MoodPersistenceError, MoodRepository, MoodService};
use crate::domain::{Error, HISTORY_LIMIT, MoodEntry, NewMood, UserId};

#[derive(Clone)]
pub struct MoodLog<R> {
    moods: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> MoodLog<R> {
    pub fn new(moods: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { moods, clock }
    }
}

pub(crate) fn map_mood_error(error: MoodPersistenceError) -> Error {
    match error {
        MoodPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("mood repository unavailable: {message}"))
        }
        MoodPersistenceError::Query { message } => {
            Error::internal(format!("mood repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> MoodService for MoodLog<R>
where
    R: MoodRepository,
{
    async fn record(&self, user_id: &UserId, sample: NewMood) -> Result<MoodEntry, Error> {
        let entry = MoodEntry::record(user_id.clone(), sample, self.clock.utc());
        self.moods.insert(&entry).await.map_err(map_mood_error)?;
        debug!(user_id = %user_id, entry_id = %entry.id, "mood recorded");
        Ok(entry)
    }

    async fn history(&self, user_id: &UserId) -> Result<Vec<MoodEntry>, Error> {
        self.moods
            .recent(user_id, HISTORY_LIMIT)
            .await
            .map_err(map_mood_error)
    }
}
