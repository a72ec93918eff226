//! Challenge instances and the progress they earn.
//!
//! The challenge catalogue lives outside this service; a challenge is only
//! known by its integer id. Each start creates a new instance, and each
//! completion turns exactly one started instance into a [`ProgressRecord`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::user::UserId;

/// Points awarded for every completed challenge.
pub const POINTS_PER_COMPLETION: i32 = 10;

/// Number of completions reported in a progress summary.
pub const RECENT_COMPLETIONS: usize = 5;

/// Identifier of a challenge in the external catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChallengeId(i32);

impl ChallengeId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for ChallengeId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a challenge instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChallengeStatus {
    Started,
    Completed,
}

impl ChallengeStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown challenge status: {0}")]
pub struct UnknownChallengeStatus(pub String);

impl FromStr for ChallengeStatus {
    type Err = UnknownChallengeStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "started" => Ok(Self::Started),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownChallengeStatus(other.to_owned())),
        }
    }
}

/// One attempt by a user at a challenge.
///
/// ## Invariants
/// - `completed_at` is set exactly when `status` is `Completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeInstance {
    pub id: Uuid,
    pub user_id: UserId,
    pub challenge_id: ChallengeId,
    pub status: ChallengeStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ChallengeInstance {
    /// A fresh instance in the `started` state.
    #[must_use]
    pub fn start(user_id: UserId, challenge_id: ChallengeId, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            challenge_id,
            status: ChallengeStatus::Started,
            started_at,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.status == ChallengeStatus::Started
    }

    /// Transition to `completed`.
    pub fn complete(&mut self, completed_at: DateTime<Utc>) {
        self.status = ChallengeStatus::Completed;
        self.completed_at = Some(completed_at);
    }
}

/// Points earned by one completion. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub challenge_id: ChallengeId,
    pub completed_at: DateTime<Utc>,
    pub points: i32,
}

impl ProgressRecord {
    /// Record for a completion just performed.
    #[must_use]
    pub fn award(user_id: UserId, challenge_id: ChallengeId, completed_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            challenge_id,
            completed_at,
            points: POINTS_PER_COMPLETION,
        }
    }
}

/// Aggregate progress for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSummary {
    pub total_points: i64,
    pub completed_count: u64,
    pub active_challenges: Vec<ChallengeInstance>,
    pub recent_completions: Vec<ProgressRecord>,
}

impl ProgressSummary {
    /// Fold progress records and started instances into a summary.
    ///
    /// `records` may arrive in any order; the recent list is taken after
    /// sorting by completion time, newest first.
    #[must_use]
    pub fn from_parts(
        mut records: Vec<ProgressRecord>,
        active_challenges: Vec<ChallengeInstance>,
    ) -> Self {
        let total_points = records.iter().map(|r| i64::from(r.points)).sum();
        let completed_count = records.len() as u64;
        records.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        records.truncate(RECENT_COMPLETIONS);
        Self {
            total_points,
            completed_count,
            active_challenges,
            recent_completions: records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[case("started", ChallengeStatus::Started)]
    #[case("completed", ChallengeStatus::Completed)]
    fn status_round_trips_through_str(#[case] raw: &str, #[case] status: ChallengeStatus) {
        assert_eq!(raw.parse::<ChallengeStatus>(), Ok(status));
        assert_eq!(status.as_str(), raw);
    }

    #[rstest]
    fn unknown_status_is_rejected() {
        assert!("paused".parse::<ChallengeStatus>().is_err());
    }

    #[rstest]
    fn completing_sets_status_and_timestamp() {
        let mut instance = ChallengeInstance::start(UserId::random(), 3.into(), base());
        assert!(instance.is_started());
        instance.complete(base() + Duration::hours(1));
        assert_eq!(instance.status, ChallengeStatus::Completed);
        assert_eq!(instance.completed_at, Some(base() + Duration::hours(1)));
    }

    #[rstest]
    fn summary_sums_points_and_keeps_five_newest() {
        let user = UserId::random();
        let records: Vec<ProgressRecord> = (0..7)
            .map(|i| {
                let completed_at = base() + Duration::hours(i64::from(i));
                ProgressRecord::award(user.clone(), i.into(), completed_at)
            })
            .collect();

        let summary = ProgressSummary::from_parts(records, Vec::new());

        assert_eq!(summary.total_points, 70);
        assert_eq!(summary.completed_count, 7);
        let recent: Vec<i32> = summary
            .recent_completions
            .iter()
            .map(|r| r.challenge_id.get())
            .collect();
        assert_eq!(recent, vec![6, 5, 4, 3, 2]);
    }

    #[rstest]
    fn empty_summary_is_zeroed() {
        let summary = ProgressSummary::from_parts(Vec::new(), Vec::new());
        assert_eq!(summary.total_points, 0);
        assert_eq!(summary.completed_count, 0);
        assert!(summary.recent_completions.is_empty());
    }
}
