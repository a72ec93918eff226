//! PostgreSQL-backed `ChallengeRepository`.
//!
//! Completion runs in one transaction: the oldest started instance is
//! selected `FOR UPDATE SKIP LOCKED`, flipped to `completed`, and its progress
//! record inserted. A concurrent completion skips the locked row and takes
//! the next started instance, or finds none.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ChallengePersistenceError, ChallengeRepository};
use crate::domain::{ChallengeId, ChallengeInstance, ChallengeStatus, ProgressRecord, UserId};

use super::error_mapping::{map_diesel_error as map_basic_diesel_error, map_pool_error};
use super::models::{
    ChallengeInstanceRow, NewChallengeInstanceRow, NewProgressRecordRow, ProgressRecordRow,
};
use super::pool::DbPool;
use super::schema::{challenge_instances, progress_records};

#[derive(Clone)]
pub struct DieselChallengeRepository {
    pool: DbPool,
}

impl DieselChallengeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ChallengePersistenceError {
    map_basic_diesel_error(
        error,
        ChallengePersistenceError::query,
        ChallengePersistenceError::connection,
    )
}

fn row_to_instance(
    row: ChallengeInstanceRow,
) -> Result<ChallengeInstance, ChallengePersistenceError> {
    let status = row
        .status
        .parse::<ChallengeStatus>()
        .map_err(|err| ChallengePersistenceError::query(err.to_string()))?;
    Ok(ChallengeInstance {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        challenge_id: ChallengeId::new(row.challenge_id),
        status,
        started_at: row.started_at,
        completed_at: row.completed_at,
    })
}

fn row_to_record(row: ProgressRecordRow) -> ProgressRecord {
    ProgressRecord {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        challenge_id: ChallengeId::new(row.challenge_id),
        completed_at: row.completed_at,
        points: row.points,
    }
}

#[async_trait]
impl ChallengeRepository for DieselChallengeRepository {
    async fn insert_started(
        &self,
        instance: &ChallengeInstance,
    ) -> Result<(), ChallengePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ChallengePersistenceError::connection))?;
        let row = NewChallengeInstanceRow {
            id: instance.id,
            user_id: *instance.user_id.as_uuid(),
            challenge_id: instance.challenge_id.get(),
            status: instance.status.as_str(),
            started_at: instance.started_at,
            completed_at: instance.completed_at,
        };
        diesel::insert_into(challenge_instances::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn complete_oldest_started(
        &self,
        user_id: &UserId,
        challenge_id: ChallengeId,
        completed_at: DateTime<Utc>,
    ) -> Result<Option<ProgressRecord>, ChallengePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ChallengePersistenceError::connection))?;
        let owner = user_id.clone();

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let target: Option<Uuid> = challenge_instances::table
                    .filter(challenge_instances::user_id.eq(owner.as_uuid()))
                    .filter(challenge_instances::challenge_id.eq(challenge_id.get()))
                    .filter(challenge_instances::status.eq(ChallengeStatus::Started.as_str()))
                    .order((
                        challenge_instances::started_at.asc(),
                        challenge_instances::id.asc(),
                    ))
                    .select(challenge_instances::id)
                    .for_update()
                    .skip_locked()
                    .first(conn)
                    .await
                    .optional()?;

                let Some(instance_id) = target else {
                    debug!(user_id = %owner, challenge_id = %challenge_id, "no started instance");
                    return Ok(None);
                };

                diesel::update(challenge_instances::table.find(instance_id))
                    .set((
                        challenge_instances::status.eq(ChallengeStatus::Completed.as_str()),
                        challenge_instances::completed_at.eq(Some(completed_at)),
                    ))
                    .execute(conn)
                    .await?;

                let record = ProgressRecord::award(owner.clone(), challenge_id, completed_at);
                diesel::insert_into(progress_records::table)
                    .values(&NewProgressRecordRow {
                        id: record.id,
                        user_id: *owner.as_uuid(),
                        challenge_id: challenge_id.get(),
                        completed_at,
                        points: record.points,
                    })
                    .execute(conn)
                    .await?;

                Ok(Some(record))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn list_started(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ChallengeInstance>, ChallengePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ChallengePersistenceError::connection))?;
        let rows: Vec<ChallengeInstanceRow> = challenge_instances::table
            .filter(challenge_instances::user_id.eq(user_id.as_uuid()))
            .filter(challenge_instances::status.eq(ChallengeStatus::Started.as_str()))
            .order((
                challenge_instances::started_at.asc(),
                challenge_instances::id.asc(),
            ))
            .select(ChallengeInstanceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_instance).collect()
    }

    async fn progress_records(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ProgressRecord>, ChallengePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ChallengePersistenceError::connection))?;
        let rows: Vec<ProgressRecordRow> = progress_records::table
            .filter(progress_records::user_id.eq(user_id.as_uuid()))
            .order((
                progress_records::completed_at.desc(),
                progress_records::id.desc(),
            ))
            .select(ProgressRecordRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_record).collect())
    }

    async fn count_completions(&self, user_id: &UserId) -> Result<u64, ChallengePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ChallengePersistenceError::connection))?;
        let total: i64 = progress_records::table
            .filter(progress_records::user_id.eq(user_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(total).map_err(|_| ChallengePersistenceError::query("negative row count"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(status: &str) -> ChallengeInstanceRow {
        ChallengeInstanceRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            challenge_id: 9,
            status: status.to_owned(),
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    #[rstest]
    #[case("started", ChallengeStatus::Started)]
    #[case("completed", ChallengeStatus::Completed)]
    fn rows_decode_known_statuses(#[case] raw: &str, #[case] expected: ChallengeStatus) {
        let instance = row_to_instance(row(raw)).expect("decodes");
        assert_eq!(instance.status, expected);
        assert_eq!(instance.challenge_id.get(), 9);
    }

    #[rstest]
    fn rows_with_unknown_status_are_query_errors() {
        assert!(matches!(
            row_to_instance(row("abandoned")),
            Err(ChallengePersistenceError::Query { .. })
        ));
    }

    #[rstest]
    fn progress_rows_keep_points() {
        let record = row_to_record(ProgressRecordRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            challenge_id: 3,
            completed_at: Utc::now(),
            points: 10,
        });
        assert_eq!(record.points, 10);
        assert_eq!(record.challenge_id.get(), 3);
    }
}
