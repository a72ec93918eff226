//! Streak arithmetic and the per-user stats snapshot.
//!
//! The streak is positional: the i-th most recent mood date must fall on
//! `today - i`. Two entries on the same day therefore end the streak at the
//! second one, as does any date that cannot be read as a calendar day.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};

/// Number of most recent mood dates inspected when computing a streak.
pub const STREAK_WINDOW: usize = 30;

/// Read the calendar day out of a stored mood date.
///
/// Accepts `YYYY-MM-DD`, a naive `YYYY-MM-DDTHH:MM:SS[.f]` timestamp, or an
/// RFC 3339 timestamp. The day is taken as written, without converting
/// between offsets.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use wellness::domain::calendar_date;
///
/// let day = NaiveDate::from_ymd_opt(2026, 3, 1);
/// assert_eq!(calendar_date("2026-03-01"), day);
/// assert_eq!(calendar_date("2026-03-01T23:30:00.000Z"), day);
/// assert_eq!(calendar_date("March 1st"), None);
/// ```
#[must_use]
pub fn calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(stamp.date());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|stamp| stamp.date_naive())
}

/// Count consecutive days ending `today` covered by `dates`.
///
/// `dates` must already be ordered newest first; only the first
/// [`STREAK_WINDOW`] are looked at.
#[must_use]
pub fn compute_streak<S: AsRef<str>>(dates: &[S], today: NaiveDate) -> u32 {
    let mut streak = 0;
    for (offset, raw) in (0_u64..).zip(dates.iter().take(STREAK_WINDOW)) {
        let expected = today.checked_sub_days(Days::new(offset));
        if expected.is_none() || calendar_date(raw.as_ref()) != expected {
            break;
        }
        streak += 1;
    }
    streak
}

/// Headline numbers for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub mood_entries: u64,
    pub completed_challenges: u64,
    pub current_streak: u32,
    pub member_since: DateTime<Utc>,
}
