//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/`. Only
//! compiled for tests or with the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::PasswordHasher;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;

/// Clock pinned to an instant that tests can move explicitly.
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Clock pinned to midday UTC on the given calendar date.
    pub fn at_noon(year: i32, month: u32, day: u32) -> Self {
        let now = match Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).single() {
            Some(now) => now,
            None => panic!("invalid calendar date {year}-{month}-{day}"),
        };
        Self::new(now)
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    pub fn advance(&self, delta: TimeDelta) {
        *self.lock_clock() += delta;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Argon2id hasher with the smallest accepted cost, for fast tests.
pub fn cheap_hasher() -> PasswordHasher {
    match PasswordHasher::with_cost(1024, 1, 1) {
        Ok(hasher) => hasher,
        Err(err) => panic!("cheap argon2 parameters rejected: {err}"),
    }
}

/// HTTP state wired to a fresh in-memory store and the given clock.
pub fn memory_http_state(clock: Arc<FixedClock>) -> HttpState {
    HttpState::in_memory(
        Arc::new(InMemoryStore::new()),
        clock,
        cheap_hasher(),
        crate::domain::TokenSecret::new(b"integration-test-secret-0123456789".to_vec()),
    )
}
