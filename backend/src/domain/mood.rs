//! Mood log entries.
//!
//! Entries are append-only. The `date` is whatever string the client sent,
//! stored verbatim; ordering and streak maths work on that string.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::user::UserId;

/// Maximum number of entries returned by a history read.
pub const HISTORY_LIMIT: usize = 30;

/// Validation failures for a mood sample.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoodValidationError {
    #[error("date must not be empty")]
    EmptyDate,
}

/// A mood sample as submitted by the client.
///
/// ## Invariants
/// - `date` is non-empty; its format is not checked.
///
/// # Examples
/// ```
/// use wellness::domain::NewMood;
///
/// let sample = NewMood::try_from_parts(4, "2026-03-01").unwrap();
/// assert_eq!(sample.date(), "2026-03-01");
/// assert!(NewMood::try_from_parts(4, "").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMood {
    mood: i32,
    date: String,
}

impl NewMood {
    pub fn try_from_parts(mood: i32, date: &str) -> Result<Self, MoodValidationError> {
        if date.is_empty() {
            return Err(MoodValidationError::EmptyDate);
        }
        Ok(Self {
            mood,
            date: date.to_owned(),
        })
    }

    #[must_use]
    pub fn mood(&self) -> i32 {
        self.mood
    }

    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }
}

/// A stored mood sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: UserId,
    pub mood: i32,
    pub date: String,
    pub created_at: DateTime<Utc>,
}

impl MoodEntry {
    /// Stamp a validated sample for `user_id`.
    #[must_use]
    pub fn record(user_id: UserId, sample: NewMood, created_at: DateTime<Utc>) -> Self {
        let NewMood { mood, date } = sample;
        Self {
            id: Uuid::new_v4(),
            user_id,
            mood,
            date,
            created_at,
        }
    }
}

/// Order entries by stored date string, newest first, and keep `limit`.
///
/// Adapters without native ordering use this so every store agrees on the
/// lexical ordering.
pub fn newest_first(mut entries: Vec<MoodEntry>, limit: usize) -> Vec<MoodEntry> {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(date: &str) -> MoodEntry {
        MoodEntry::record(
            UserId::random(),
            NewMood::try_from_parts(3, date).expect("valid sample"),
            Utc::now(),
        )
    }

    #[rstest]
    #[case("2026-03-01")]
    #[case("yesterday-ish")]
    #[case(" ")]
    fn any_non_empty_date_is_accepted(#[case] date: &str) {
        let sample = NewMood::try_from_parts(5, date).expect("accepted");
        assert_eq!(sample.date(), date);
        assert_eq!(sample.mood(), 5);
    }

    #[rstest]
    fn empty_date_is_rejected() {
        assert_eq!(
            NewMood::try_from_parts(5, ""),
            Err(MoodValidationError::EmptyDate)
        );
    }

    #[rstest]
    fn newest_first_orders_lexically_and_truncates() {
        let entries = vec![
            entry("2026-03-01"),
            entry("2026-03-03T08:00:00Z"),
            entry("2026-03-02"),
        ];
        let dates: Vec<String> = newest_first(entries, 2)
            .into_iter()
            .map(|e| e.date)
            .collect();
        assert_eq!(dates, vec!["2026-03-03T08:00:00Z", "2026-03-02"]);
    }
}
