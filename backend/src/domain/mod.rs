//! Domain entities, services and ports.
//!
//! Purpose: hold the wellness rules (accounts, session tokens, the mood log,
//! challenge lifecycle and streak maths) independent of HTTP and storage.
//! Inbound adapters call the driving ports in [`ports`]; outbound adapters
//! implement the driven ones.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - User, UserId, Username, Email: account identity.
//! - PasswordHasher, SessionTokens: credential primitives.
//! - MoodEntry, ChallengeInstance, ProgressRecord, UserStats: tracked data.
//! - CredentialStore, MoodLog, ChallengeTracker, StatsEngine: services.

pub mod auth;
pub mod challenge;
pub mod challenge_tracker;
pub mod credential_store;
pub mod error;
pub mod mood;
pub mod mood_log;
pub mod password;
pub mod ports;
pub mod stats;
pub mod stats_engine;
pub mod token;
pub mod user;

pub use self::auth::{CredentialsValidationError, LoginCredentials, Registration};
pub use self::challenge::{
    ChallengeId, ChallengeInstance, ChallengeStatus, POINTS_PER_COMPLETION, ProgressRecord,
    ProgressSummary, RECENT_COMPLETIONS, UnknownChallengeStatus,
};
pub use self::challenge_tracker::ChallengeTracker;
pub use self::credential_store::CredentialStore;
pub use self::error::{Error, ErrorCode};
pub use self::mood::{HISTORY_LIMIT, MoodEntry, MoodValidationError, NewMood, newest_first};
pub use self::mood_log::MoodLog;
pub use self::password::{PasswordHashError, PasswordHasher};
pub use self::stats::{STREAK_WINDOW, UserStats, calendar_date, compute_streak};
pub use self::stats_engine::StatsEngine;
pub use self::token::{SessionTokens, TOKEN_TTL_DAYS, TokenClaims, TokenError, TokenSecret};
pub use self::user::{Email, USERNAME_MAX, User, UserId, UserValidationError, Username};
