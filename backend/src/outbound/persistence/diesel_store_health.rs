//! Liveness probe for the PostgreSQL store.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{StoreHealth, StoreHealthError};

use super::pool::DbPool;

#[derive(Clone)]
pub struct DieselStoreHealth {
    pool: DbPool,
}

impl DieselStoreHealth {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreHealth for DieselStoreHealth {
    async fn ping(&self) -> Result<(), StoreHealthError> {
        let mut conn = self.pool.get().await.map_err(|err| {
            warn!(error = %err, "store health check could not get a connection");
            StoreHealthError::unavailable(err.into_message())
        })?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                warn!(error = %err, "store health check query failed");
                StoreHealthError::unavailable(err.to_string())
            })
    }
}
