//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between Diesel rows and domain types and nothing
//! more. Row structs and the schema stay private to this module; database
//! failures leave as the port error types.
//!
//! ```ignore
//! use wellness::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/wellness")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_challenge_repository;
mod diesel_mood_repository;
mod diesel_store_health;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_challenge_repository::DieselChallengeRepository;
pub use diesel_mood_repository::DieselMoodRepository;
pub use diesel_store_health::DieselStoreHealth;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
