//! Stats snapshot service implementing [`StatsService`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::challenge_tracker::map_challenge_error;
use crate::domain::mood_log::map_mood_error;
use crate::domain::ports::{ChallengeRepository, MoodRepository, StatsService};
use crate::domain::{Error, STREAK_WINDOW, User, UserStats, compute_streak};

/// Derives counts and the current streak from the mood and challenge stores.
#[derive(Clone)]
pub struct StatsEngine<M, C> {
    moods: Arc<M>,
    challenges: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<M, C> StatsEngine<M, C> {
    pub fn new(moods: Arc<M>, challenges: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            moods,
            challenges,
            clock,
        }
    }
}

#[async_trait]
impl<M, C> StatsService for StatsEngine<M, C>
where
    M: MoodRepository,
    C: ChallengeRepository,
{
    async fn stats(&self, user: &User) -> Result<UserStats, Error> {
        let user_id = user.id();
        let mood_entries = self.moods.count(user_id).await.map_err(map_mood_error)?;
        let completed_challenges = self
            .challenges
            .count_completions(user_id)
            .await
            .map_err(map_challenge_error)?;
        let recent = self
            .moods
            .recent(user_id, STREAK_WINDOW)
            .await
            .map_err(map_mood_error)?;
        let dates: Vec<&str> = recent.iter().map(|entry| entry.date.as_str()).collect();
        let current_streak = compute_streak(&dates, self.clock.utc().date_naive());

        Ok(UserStats {
            mood_entries,
            completed_challenges,
            current_streak,
            member_since: user.created_at(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockChallengeRepository, MockMoodRepository};
    use crate::domain::{Email, MoodEntry, NewMood, UserId, Username};
    use crate::test_support::FixedClock;
    use chrono::{TimeZone, Utc};

    fn user() -> User {
        User::new(
            UserId::random(),
            Username::new("alice").expect("username"),
            Email::new("alice@example.com").expect("email"),
            "$argon2id$placeholder".to_owned(),
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0)
                .single()
                .expect("valid timestamp"),
        )
    }

    fn entries(user: &User, dates: &[&str]) -> Vec<MoodEntry> {
        dates
            .iter()
            .map(|date| {
                MoodEntry::record(
                    user.id().clone(),
                    NewMood::try_from_parts(3, date).expect("valid"),
                    Utc::now(),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn stats_combine_counts_streak_and_membership() {
        let user = user();
        let recent = entries(&user, &["2026-03-10", "2026-03-09T22:00:00.000Z", "2026-03-07"]);
        let mut moods = MockMoodRepository::new();
        moods.expect_count().return_once(|_| Ok(12));
        moods
            .expect_recent()
            .withf(|_, limit| *limit == 30)
            .return_once(move |_, _| Ok(recent));
        let mut challenges = MockChallengeRepository::new();
        challenges.expect_count_completions().return_once(|_| Ok(4));

        let engine = StatsEngine::new(
            Arc::new(moods),
            Arc::new(challenges),
            Arc::new(FixedClock::at_noon(2026, 3, 10)),
        );
        let stats = engine.stats(&user).await.expect("stats");

        assert_eq!(stats.mood_entries, 12);
        assert_eq!(stats.completed_challenges, 4);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.member_since, user.created_at());
    }

    #[tokio::test]
    async fn streak_is_zero_without_an_entry_today() {
        let user = user();
        let recent = entries(&user, &["2026-03-09", "2026-03-08"]);
        let mut moods = MockMoodRepository::new();
        moods.expect_count().return_once(|_| Ok(2));
        moods.expect_recent().return_once(move |_, _| Ok(recent));
        let mut challenges = MockChallengeRepository::new();
        challenges.expect_count_completions().return_once(|_| Ok(0));

        let engine = StatsEngine::new(
            Arc::new(moods),
            Arc::new(challenges),
            Arc::new(FixedClock::at_noon(2026, 3, 10)),
        );
        assert_eq!(engine.stats(&user).await.expect("stats").current_streak, 0);
    }
}
