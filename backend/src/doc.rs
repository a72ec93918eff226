//! OpenAPI documentation.
//!
//! [`ApiDoc`] registers every handler in [`crate::inbound::http`], the
//! request and response bodies they exchange, and the bearer-token security
//! scheme. Swagger UI serves it at `/docs` in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::challenges::{
    ActiveChallenge, ChallengeRequest, CompleteChallengeResponse, CompletionItem,
    ProgressResponse,
};
use crate::inbound::http::dto::MessageResponse;
use crate::inbound::http::health::{BannerResponse, StoreHealthResponse};
use crate::inbound::http::mood::{MoodHistoryItem, SaveMoodRequest};
use crate::inbound::http::stats::StatsResponse;
use crate::inbound::http::users::{
    LoginRequest, LoginResponse, MeResponse, RegisterRequest, RegisterResponse, UserSummary,
};

/// Name of the security scheme protected operations refer to.
pub const BEARER_SCHEME: &str = "bearer";

/// Adds the `Authorization: Bearer <jwt>` security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Daily Wellness API",
        description = "Accounts, mood logging, challenges and streak statistics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::mood::save_mood,
        crate::inbound::http::mood::mood_history,
        crate::inbound::http::challenges::start_challenge,
        crate::inbound::http::challenges::complete_challenge,
        crate::inbound::http::challenges::progress,
        crate::inbound::http::stats::stats,
        crate::inbound::http::health::store_health,
        crate::inbound::http::health::root,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        MessageResponse,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        UserSummary,
        MeResponse,
        SaveMoodRequest,
        MoodHistoryItem,
        ChallengeRequest,
        CompleteChallengeResponse,
        ActiveChallenge,
        CompletionItem,
        ProgressResponse,
        StatsResponse,
        StoreHealthResponse,
        BannerResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login and the current account"),
        (name = "mood", description = "Daily mood samples"),
        (name = "challenges", description = "Challenge lifecycle and progress"),
        (name = "stats", description = "Derived statistics"),
        (name = "health", description = "Probes and store connectivity")
    )
)]
pub struct ApiDoc;
