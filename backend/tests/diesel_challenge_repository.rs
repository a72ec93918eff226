//! `DieselChallengeRepository` against embedded PostgreSQL.
//!
//! Completion must take the oldest started instance, flip it exactly once,
//! and write its progress record in the same transaction.

use chrono::Duration;
use rstest::{fixture, rstest};

use wellness::domain::ports::{ChallengePersistenceError, ChallengeRepository};
use wellness::domain::{
    ChallengeId, ChallengeInstance, POINTS_PER_COMPLETION, ProgressRecord, UserId,
};
use wellness::outbound::persistence::DieselChallengeRepository;

mod support;

use support::embedded_postgres::at;
use support::{DieselDb, drop_table};

const MEDITATE: ChallengeId = ChallengeId::new(4);

#[fixture]
fn db() -> Option<DieselDb> {
    DieselDb::provision()
}

fn started(owner: &UserId, hour: u32) -> ChallengeInstance {
    ChallengeInstance::start(owner.clone(), MEDITATE, at(2026, 3, 1, hour))
}

#[rstest]
fn completion_takes_oldest_started_instance_once(db: Option<DieselDb>) {
    let Some(db) = db else {
        return;
    };
    let alice = db.seed_user("alice");
    let challenges = DieselChallengeRepository::new(db.pool.clone());
    let older = started(alice.id(), 8);
    let newer = started(alice.id(), 9);
    let done_at = at(2026, 3, 1, 12);

    db.runtime.block_on(async {
        challenges.insert_started(&newer).await.expect("insert");
        challenges.insert_started(&older).await.expect("insert");

        let first = challenges
            .complete_oldest_started(alice.id(), MEDITATE, done_at)
            .await
            .expect("completion runs")
            .expect("a started instance exists");
        assert_eq!(first.points, POINTS_PER_COMPLETION);
        assert_eq!(first.completed_at, done_at);

        let still_started = challenges.list_started(alice.id()).await.expect("list");
        assert_eq!(still_started, vec![newer.clone()]);

        let second = challenges
            .complete_oldest_started(alice.id(), MEDITATE, done_at + Duration::hours(1))
            .await
            .expect("completion runs");
        assert!(second.is_some());

        let third = challenges
            .complete_oldest_started(alice.id(), MEDITATE, done_at + Duration::hours(2))
            .await
            .expect("completion runs");
        assert_eq!(third, None);

        let records = challenges.progress_records(alice.id()).await.expect("records");
        let times: Vec<_> = records.iter().map(|r| r.completed_at).collect();
        assert_eq!(times, vec![done_at + Duration::hours(1), done_at]);
        assert_eq!(challenges.count_completions(alice.id()).await.expect("count"), 2);
        assert!(challenges.list_started(alice.id()).await.expect("list").is_empty());
    });
}

#[rstest]
fn completion_ignores_other_users_and_challenges(db: Option<DieselDb>) {
    let Some(db) = db else {
        return;
    };
    let alice = db.seed_user("alice");
    let bob = db.seed_user("bob");
    let challenges = DieselChallengeRepository::new(db.pool.clone());

    db.runtime.block_on(async {
        challenges
            .insert_started(&started(alice.id(), 8))
            .await
            .expect("insert");

        let for_bob = challenges
            .complete_oldest_started(bob.id(), MEDITATE, at(2026, 3, 1, 12))
            .await
            .expect("completion runs");
        assert_eq!(for_bob, None);

        let other_challenge = challenges
            .complete_oldest_started(alice.id(), ChallengeId::new(5), at(2026, 3, 1, 12))
            .await
            .expect("completion runs");
        assert_eq!(other_challenge, None);
        assert_eq!(challenges.list_started(alice.id()).await.expect("list").len(), 1);
    });
}

#[rstest]
fn concurrent_completions_finish_one_instance(db: Option<DieselDb>) {
    let Some(db) = db else {
        return;
    };
    let alice = db.seed_user("alice");
    let challenges = DieselChallengeRepository::new(db.pool.clone());
    let done_at = at(2026, 3, 1, 12);

    let outcomes: Vec<Option<ProgressRecord>> = db.runtime.block_on(async {
        challenges
            .insert_started(&started(alice.id(), 8))
            .await
            .expect("insert");
        let (left, right) = tokio::join!(
            challenges.complete_oldest_started(alice.id(), MEDITATE, done_at),
            challenges.complete_oldest_started(alice.id(), MEDITATE, done_at),
        );
        vec![left.expect("completion runs"), right.expect("completion runs")]
    });

    assert_eq!(outcomes.iter().flatten().count(), 1);
    let completions = db
        .runtime
        .block_on(challenges.count_completions(alice.id()))
        .expect("count");
    assert_eq!(completions, 1);
}

#[rstest]
fn failed_progress_write_leaves_instance_started(db: Option<DieselDb>) {
    let Some(db) = db else {
        return;
    };
    let alice = db.seed_user("alice");
    let challenges = DieselChallengeRepository::new(db.pool.clone());
    let instance = started(alice.id(), 8);
    db.runtime
        .block_on(challenges.insert_started(&instance))
        .expect("insert");
    drop_table(&db.database_url, "progress_records").expect("drop succeeds");

    let err = db
        .runtime
        .block_on(challenges.complete_oldest_started(alice.id(), MEDITATE, at(2026, 3, 1, 12)))
        .expect_err("completion fails without progress table");
    assert!(
        matches!(err, ChallengePersistenceError::Query { .. }),
        "expected Query error, got {err:?}"
    );

    let still_started = db
        .runtime
        .block_on(challenges.list_started(alice.id()))
        .expect("list");
    assert_eq!(still_started, vec![instance]);
}
