//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod challenges;
pub mod dto;
pub mod error;
pub mod health;
pub mod mood;
pub mod state;
pub mod stats;
#[cfg(test)]
pub mod test_utils;
pub mod token_config;
pub mod users;

use actix_web::{Scope, web};

pub use error::ApiResult;

/// Every route mounted under `/api`.
///
/// Handlers expect `web::Data<HttpState>` to be registered on the app.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(users::register)
        .service(users::login)
        .service(users::current_user)
        .service(mood::save_mood)
        .service(mood::mood_history)
        .service(challenges::start_challenge)
        .service(challenges::complete_challenge)
        .service(challenges::progress)
        .service(stats::stats)
        .service(health::store_health)
}
