//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and only depend on the
//! driving ports, so they stay testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    ChallengeService, CredentialService, MoodService, StatsService, StoreHealth,
};
use crate::domain::{
    ChallengeTracker, CredentialStore, MoodLog, PasswordHasher, SessionTokens, StatsEngine,
    TokenSecret,
};
use crate::outbound::memory::InMemoryStore;

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub credentials: Arc<dyn CredentialService>,
    pub moods: Arc<dyn MoodService>,
    pub challenges: Arc<dyn ChallengeService>,
    pub stats: Arc<dyn StatsService>,
    pub store_health: Arc<dyn StoreHealth>,
    pub clock: Arc<dyn Clock>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub credentials: Arc<dyn CredentialService>,
    pub moods: Arc<dyn MoodService>,
    pub challenges: Arc<dyn ChallengeService>,
    pub stats: Arc<dyn StatsService>,
    pub store_health: Arc<dyn StoreHealth>,
    pub clock: Arc<dyn Clock>,
    pub tokens: SessionTokens,
}

impl HttpState {
    /// Construct state from a ports bundle and the token issuer.
    pub fn new(ports: HttpStatePorts, tokens: SessionTokens) -> Self {
        let HttpStatePorts {
            credentials,
            moods,
            challenges,
            stats,
            store_health,
            clock,
        } = ports;
        Self {
            credentials,
            moods,
            challenges,
            stats,
            store_health,
            clock,
            tokens,
        }
    }

    /// Wire every service over one in-memory store.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use wellness::domain::{PasswordHasher, TokenSecret};
    /// use wellness::inbound::http::state::HttpState;
    /// use wellness::outbound::memory::InMemoryStore;
    ///
    /// let state = HttpState::in_memory(
    ///     Arc::new(InMemoryStore::new()),
    ///     Arc::new(DefaultClock),
    ///     PasswordHasher::new(),
    ///     TokenSecret::new(vec![7_u8; 32]),
    /// );
    /// let _tokens = state.tokens.clone();
    /// ```
    pub fn in_memory(
        store: Arc<InMemoryStore>,
        clock: Arc<dyn Clock>,
        hasher: PasswordHasher,
        secret: TokenSecret,
    ) -> Self {
        let ports = HttpStatePorts {
            credentials: Arc::new(CredentialStore::new(store.clone(), hasher, clock.clone())),
            moods: Arc::new(MoodLog::new(store.clone(), clock.clone())),
            challenges: Arc::new(ChallengeTracker::new(store.clone(), clock.clone())),
            stats: Arc::new(StatsEngine::new(store.clone(), store.clone(), clock.clone())),
            store_health: store,
            clock: clock.clone(),
        };
        Self::new(ports, SessionTokens::new(secret, clock))
    }
}
