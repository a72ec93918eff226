//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; repositories convert them
//! to domain values through validated constructors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{challenge_instances, mood_entries, progress_records, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = mood_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MoodEntryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood: i32,
    pub date: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = mood_entries)]
pub(crate) struct NewMoodEntryRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood: i32,
    pub date: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = challenge_instances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ChallengeInstanceRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub challenge_id: i32,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = challenge_instances)]
pub(crate) struct NewChallengeInstanceRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub challenge_id: i32,
    pub status: &'a str,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = progress_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProgressRecordRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub challenge_id: i32,
    pub completed_at: DateTime<Utc>,
    pub points: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = progress_records)]
pub(crate) struct NewProgressRecordRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub challenge_id: i32,
    pub completed_at: DateTime<Utc>,
    pub points: i32,
}
