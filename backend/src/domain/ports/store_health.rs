//! Driven port reporting whether the backing store answers.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Reasons the store is considered unhealthy.
    pub enum StoreHealthError {
        /// The store could not be reached or did not answer.
        Unavailable { message: String } => "store unavailable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Round-trip a trivial request to the store.
    async fn ping(&self) -> Result<(), StoreHealthError>;
}
