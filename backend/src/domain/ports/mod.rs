//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`StoreHealth`]) are implemented by outbound
//! adapters. Driving ports (`*Service`) are what inbound adapters call. Each
//! driven port exposes a typed error enum so adapters map their failures into
//! predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod challenge_repository;
mod challenge_service;
mod credential_service;
mod mood_repository;
mod mood_service;
mod stats_service;
mod store_health;
mod user_repository;

#[cfg(test)]
pub use challenge_repository::MockChallengeRepository;
pub use challenge_repository::{ChallengePersistenceError, ChallengeRepository};
#[cfg(test)]
pub use challenge_service::MockChallengeService;
pub use challenge_service::ChallengeService;
#[cfg(test)]
pub use credential_service::MockCredentialService;
pub use credential_service::CredentialService;
#[cfg(test)]
pub use mood_repository::MockMoodRepository;
pub use mood_repository::{MoodPersistenceError, MoodRepository};
#[cfg(test)]
pub use mood_service::MockMoodService;
pub use mood_service::MoodService;
#[cfg(test)]
pub use stats_service::MockStatsService;
pub use stats_service::StatsService;
#[cfg(test)]
pub use store_health::MockStoreHealth;
pub use store_health::{StoreHealth, StoreHealthError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
