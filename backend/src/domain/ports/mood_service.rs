//! Driving port for the mood log.
use async_trait::async_trait;

use crate::domain::{Error, MoodEntry, NewMood, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MoodService: Send + Sync {
    /// Append a sample for `user_id`.
    async fn record(&self, user_id: &UserId, sample: NewMood) -> Result<MoodEntry, Error>;

    /// The most recent samples, newest date first.
    async fn history(&self, user_id: &UserId) -> Result<Vec<MoodEntry>, Error>;
}
