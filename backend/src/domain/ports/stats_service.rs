//! Driving port for the stats snapshot.
use async_trait::async_trait;

use crate::domain::{Error, User, UserStats};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsService: Send + Sync {
    /// Entry counts, current streak and membership date for `user`.
    async fn stats(&self, user: &User) -> Result<UserStats, Error>;
}
