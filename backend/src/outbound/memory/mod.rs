//! In-process adapter implementing every driven port.
//!
//! Used by tests and by local development when no database is configured.
//! All collections sit behind one mutex held for a single operation, which
//! gives the same atomicity the PostgreSQL adapter gets from transactions.
//! Data lives only as long as the process.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    ChallengePersistenceError, ChallengeRepository, MoodPersistenceError, MoodRepository,
    StoreHealth, StoreHealthError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    ChallengeId, ChallengeInstance, Email, MoodEntry, ProgressRecord, User, UserId, Username,
    newest_first,
};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    moods: Vec<MoodEntry>,
    challenges: Vec<ChallengeInstance>,
    progress: Vec<ProgressRecord>,
}

/// Shared in-memory store.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Collections>,
}

#[derive(Debug, thiserror::Error)]
#[error("in-memory store lock poisoned")]
struct Poisoned;

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, Poisoned> {
        self.inner.lock().map_err(|_| Poisoned)
    }
}

fn to_u64(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut store = self
            .lock()
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        if store.users.iter().any(|u| u.username() == user.username()) {
            return Err(UserPersistenceError::duplicate_username());
        }
        if store.users.iter().any(|u| u.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email());
        }
        store.users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let store = self
            .lock()
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        Ok(store.users.iter().find(|u| u.id() == id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let store = self
            .lock()
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        Ok(store.users.iter().find(|u| u.username() == username).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let store = self
            .lock()
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        Ok(store.users.iter().find(|u| u.email() == email).cloned())
    }
}

#[async_trait]
impl MoodRepository for InMemoryStore {
    async fn insert(&self, entry: &MoodEntry) -> Result<(), MoodPersistenceError> {
        let mut store = self
            .lock()
            .map_err(|err| MoodPersistenceError::query(err.to_string()))?;
        store.moods.push(entry.clone());
        Ok(())
    }

    async fn recent(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<MoodEntry>, MoodPersistenceError> {
        let store = self
            .lock()
            .map_err(|err| MoodPersistenceError::query(err.to_string()))?;
        let owned = store
            .moods
            .iter()
            .filter(|entry| &entry.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(owned, limit))
    }

    async fn count(&self, user_id: &UserId) -> Result<u64, MoodPersistenceError> {
        let store = self
            .lock()
            .map_err(|err| MoodPersistenceError::query(err.to_string()))?;
        Ok(to_u64(
            store
                .moods
                .iter()
                .filter(|entry| &entry.user_id == user_id)
                .count(),
        ))
    }
}

#[async_trait]
impl ChallengeRepository for InMemoryStore {
    async fn insert_started(
        &self,
        instance: &ChallengeInstance,
    ) -> Result<(), ChallengePersistenceError> {
        let mut store = self
            .lock()
            .map_err(|err| ChallengePersistenceError::query(err.to_string()))?;
        store.challenges.push(instance.clone());
        Ok(())
    }

    async fn complete_oldest_started(
        &self,
        user_id: &UserId,
        challenge_id: ChallengeId,
        completed_at: DateTime<Utc>,
    ) -> Result<Option<ProgressRecord>, ChallengePersistenceError> {
        let mut store = self
            .lock()
            .map_err(|err| ChallengePersistenceError::query(err.to_string()))?;
        let oldest = store
            .challenges
            .iter_mut()
            .filter(|c| &c.user_id == user_id && c.challenge_id == challenge_id && c.is_started())
            .min_by_key(|c| c.started_at);
        let Some(instance) = oldest else {
            return Ok(None);
        };
        instance.complete(completed_at);

        let record = ProgressRecord::award(user_id.clone(), challenge_id, completed_at);
        store.progress.push(record.clone());
        Ok(Some(record))
    }

    async fn list_started(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ChallengeInstance>, ChallengePersistenceError> {
        let store = self
            .lock()
            .map_err(|err| ChallengePersistenceError::query(err.to_string()))?;
        let mut started: Vec<ChallengeInstance> = store
            .challenges
            .iter()
            .filter(|c| &c.user_id == user_id && c.is_started())
            .cloned()
            .collect();
        started.sort_by_key(|c| c.started_at);
        Ok(started)
    }

    async fn progress_records(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ProgressRecord>, ChallengePersistenceError> {
        let store = self
            .lock()
            .map_err(|err| ChallengePersistenceError::query(err.to_string()))?;
        let mut records: Vec<ProgressRecord> = store
            .progress
            .iter()
            .filter(|r| &r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(records)
    }

    async fn count_completions(&self, user_id: &UserId) -> Result<u64, ChallengePersistenceError> {
        let store = self
            .lock()
            .map_err(|err| ChallengePersistenceError::query(err.to_string()))?;
        Ok(to_u64(
            store
                .progress
                .iter()
                .filter(|r| &r.user_id == user_id)
                .count(),
        ))
    }
}

#[async_trait]
impl StoreHealth for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreHealthError> {
        self.lock()
            .map(|_| ())
            .map_err(|err| StoreHealthError::unavailable(err.to_string()))
    }
}
