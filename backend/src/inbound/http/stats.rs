//! Stats snapshot handler.

use actix_web::{get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, UserStats};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StatsResponse {
    pub mood_entries: u64,
    pub completed_challenges: u64,
    /// Consecutive days with a mood entry, ending today (UTC).
    pub current_streak: u32,
    pub member_since: DateTime<Utc>,
}

impl From<UserStats> for StatsResponse {
    fn from(value: UserStats) -> Self {
        Self {
            mood_entries: value.mood_entries,
            completed_challenges: value.completed_challenges,
            current_streak: value.current_streak,
            member_since: value.member_since,
        }
    }
}

/// Entry counts, current streak and membership date for the caller.
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Stats snapshot", body = StatsResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["stats"],
    operation_id = "stats",
    security(("bearer" = []))
)]
#[get("/stats")]
pub async fn stats(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
) -> ApiResult<web::Json<StatsResponse>> {
    let user_stats = state.stats.stats(auth.user()).await?;
    Ok(web::Json(StatsResponse::from(user_stats)))
}
