//! PostgreSQL-backed `MoodRepository`.

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MoodPersistenceError, MoodRepository};
use crate::domain::{MoodEntry, UserId};

use super::error_mapping::{map_diesel_error as map_basic_diesel_error, map_pool_error};
use super::models::{MoodEntryRow, NewMoodEntryRow};
use super::pool::DbPool;
use super::schema::mood_entries;

#[derive(Clone)]
pub struct DieselMoodRepository {
    pool: DbPool,
}

impl DieselMoodRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> MoodPersistenceError {
    map_basic_diesel_error(
        error,
        MoodPersistenceError::query,
        MoodPersistenceError::connection,
    )
}

fn row_to_entry(row: MoodEntryRow) -> MoodEntry {
    MoodEntry {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        mood: row.mood,
        date: row.date,
        created_at: row.created_at,
    }
}

#[async_trait]
impl MoodRepository for DieselMoodRepository {
    async fn insert(&self, entry: &MoodEntry) -> Result<(), MoodPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, MoodPersistenceError::connection))?;
        let row = NewMoodEntryRow {
            id: entry.id,
            user_id: *entry.user_id.as_uuid(),
            mood: entry.mood,
            date: &entry.date,
            created_at: entry.created_at,
        };
        diesel::insert_into(mood_entries::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn recent(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<MoodEntry>, MoodPersistenceError> {
        let limit = i64::try_from(limit)
            .map_err(|_| MoodPersistenceError::query("history limit out of range"))?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, MoodPersistenceError::connection))?;
        // `COLLATE "C"` keeps the ordering byte-wise regardless of the
        // database locale, matching the in-memory adapter.
        let date_bytewise = sql::<Text>(r#""mood_entries"."date" COLLATE "C""#);
        let rows: Vec<MoodEntryRow> = mood_entries::table
            .filter(mood_entries::user_id.eq(user_id.as_uuid()))
            .order((date_bytewise.desc(), mood_entries::created_at.desc()))
            .limit(limit)
            .select(MoodEntryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_entry).collect())
    }

    async fn count(&self, user_id: &UserId) -> Result<u64, MoodPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, MoodPersistenceError::connection))?;
        let total: i64 = mood_entries::table
            .filter(mood_entries::user_id.eq(user_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(total).map_err(|_| MoodPersistenceError::query("negative row count"))
    }
}
