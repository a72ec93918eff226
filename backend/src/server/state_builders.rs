//! Store selection and HTTP state wiring.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use wellness::domain::{
    ChallengeTracker, CredentialStore, MoodLog, PasswordHasher, SessionTokens, StatsEngine,
    TokenSecret,
};
use wellness::inbound::http::state::{HttpState, HttpStatePorts};
use wellness::inbound::http::token_config::BuildMode;
use wellness::outbound::memory::InMemoryStore;
use wellness::outbound::persistence::{
    DbPool, DieselChallengeRepository, DieselMoodRepository, DieselStoreHealth,
    DieselUserRepository, PoolConfig, run_migrations,
};
use wellness::settings::AppSettings;

/// Where accounts, moods and challenges are kept.
pub enum StoreBackend {
    Postgres(DbPool),
    Memory(Arc<InMemoryStore>),
}

/// Connect to PostgreSQL when a URL is configured, otherwise fall back to
/// memory if the build mode or settings allow it.
///
/// # Errors
///
/// Fails when migrations or pool construction fail, or when no database is
/// configured in a release build without `WELLNESS_ALLOW_MEMORY_STORE`.
pub async fn connect_store(
    settings: &AppSettings,
    mode: BuildMode,
) -> std::io::Result<StoreBackend> {
    if let Some(url) = settings.database_url() {
        run_migrations(url).await.map_err(std::io::Error::other)?;
        let config = PoolConfig::new(url).with_max_size(settings.db_max_connections());
        let pool = DbPool::new(config).await.map_err(std::io::Error::other)?;
        info!(
            max_connections = settings.db_max_connections(),
            "connected to PostgreSQL"
        );
        return Ok(StoreBackend::Postgres(pool));
    }

    if mode.is_debug() || settings.allow_memory_store {
        warn!("no database configured; serving from memory, data is lost on restart");
        return Ok(StoreBackend::Memory(Arc::new(InMemoryStore::new())));
    }

    Err(std::io::Error::other(
        "WELLNESS_DATABASE_URL is required in release builds \
         (set WELLNESS_ALLOW_MEMORY_STORE=true to serve from memory)",
    ))
}

/// Wire the services over the chosen store.
pub fn build_http_state(backend: StoreBackend, secret: TokenSecret) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let hasher = PasswordHasher::new();
    match backend {
        StoreBackend::Memory(store) => HttpState::in_memory(store, clock, hasher, secret),
        StoreBackend::Postgres(pool) => {
            let users = Arc::new(DieselUserRepository::new(pool.clone()));
            let moods = Arc::new(DieselMoodRepository::new(pool.clone()));
            let challenges = Arc::new(DieselChallengeRepository::new(pool.clone()));
            let ports = HttpStatePorts {
                credentials: Arc::new(CredentialStore::new(users, hasher, clock.clone())),
                moods: Arc::new(MoodLog::new(moods.clone(), clock.clone())),
                challenges: Arc::new(ChallengeTracker::new(challenges.clone(), clock.clone())),
                stats: Arc::new(StatsEngine::new(moods, challenges, clock.clone())),
                store_health: Arc::new(DieselStoreHealth::new(pool)),
                clock: clock.clone(),
            };
            HttpState::new(ports, SessionTokens::new(secret, clock))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn settings(allow_memory_store: bool) -> AppSettings {
        AppSettings {
            bind_addr: None,
            database_url: None,
            db_max_connections: None,
            allow_memory_store,
        }
    }

    #[rstest]
    #[case(BuildMode::Debug, false)]
    #[case(BuildMode::Release, true)]
    #[tokio::test]
    async fn memory_store_is_used_when_permitted(
        #[case] mode: BuildMode,
        #[case] allow_memory_store: bool,
    ) {
        let backend = connect_store(&settings(allow_memory_store), mode)
            .await
            .expect("memory fallback");
        assert!(matches!(backend, StoreBackend::Memory(_)));
    }

    #[rstest]
    #[tokio::test]
    async fn release_without_database_is_refused() {
        let err = connect_store(&settings(false), BuildMode::Release)
            .await
            .err()
            .expect("release needs a database");
        assert!(err.to_string().contains("WELLNESS_DATABASE_URL"));
    }
}
