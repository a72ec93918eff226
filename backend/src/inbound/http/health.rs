//! Health endpoints.
//!
//! `/health/live` and `/health/ready` are orchestration probes driven by
//! [`HealthState`]. `/api/health` pings the store and always answers `200`,
//! reporting an unreachable store in the body. `GET /` is a banner.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::inbound::http::state::HttpState;

/// Shared readiness and liveness flags.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Not ready, but live.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness checks so orchestrators stop routing during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Readiness probe: `200` once the server accepts traffic, `503` before.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready())
}

/// Liveness probe: `200` while alive, `503` once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}

/// Store connectivity report.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StoreHealthResponse {
    /// `healthy` or `unhealthy`.
    #[schema(example = "healthy")]
    pub status: String,
    /// `connected` or `disconnected`.
    #[schema(example = "connected")]
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Ping the store. Failures are reported in the body, not as an error status.
#[utoipa::path(
    get,
    path = "/api/health",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Store connectivity report", body = StoreHealthResponse)
    )
)]
#[get("/health")]
pub async fn store_health(state: web::Data<HttpState>) -> web::Json<StoreHealthResponse> {
    let timestamp = state.clock.utc();
    let report = match state.store_health.ping().await {
        Ok(()) => StoreHealthResponse {
            status: "healthy".to_owned(),
            database: "connected".to_owned(),
            error: None,
            timestamp,
        },
        Err(err) => {
            warn!(error = %err, "store health check failed");
            StoreHealthResponse {
                status: "unhealthy".to_owned(),
                database: "disconnected".to_owned(),
                error: Some(err.to_string()),
                timestamp,
            }
        }
    };
    web::Json(report)
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct BannerResponse {
    pub message: String,
}

/// Service banner.
#[utoipa::path(
    get,
    path = "/",
    tags = ["health"],
    security([]),
    responses((status = 200, description = "Service is running", body = BannerResponse))
)]
#[get("/")]
pub async fn root() -> web::Json<BannerResponse> {
    web::Json(BannerResponse {
        message: "Daily Wellness API is running! 🌟".to_owned(),
    })
}
