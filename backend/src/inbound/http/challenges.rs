//! Challenge lifecycle and progress handlers.
//!
//! ```text
//! POST /api/challenge/start {"challengeId":1}
//! POST /api/challenge/complete {"challengeId":1}
//! GET /api/progress
//! ```

use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ChallengeId, ChallengeInstance, Error, ProgressRecord, ProgressSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::dto::MessageResponse;
use crate::inbound::http::state::HttpState;

/// Body for both challenge transitions.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    /// Catalogue identifier; the catalogue itself lives in the client.
    #[schema(example = 1)]
    pub challenge_id: i32,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CompleteChallengeResponse {
    #[schema(example = "Challenge completed successfully")]
    pub message: String,
    #[schema(example = 10)]
    pub points_earned: i32,
}

/// A challenge the caller has started but not completed.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ActiveChallenge {
    pub challenge_id: i32,
    #[schema(example = "started")]
    pub status: String,
    pub started_at: DateTime<Utc>,
}

impl From<ChallengeInstance> for ActiveChallenge {
    fn from(instance: ChallengeInstance) -> Self {
        Self {
            challenge_id: instance.challenge_id.get(),
            status: instance.status.as_str().to_owned(),
            started_at: instance.started_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CompletionItem {
    pub challenge_id: i32,
    pub completed_at: DateTime<Utc>,
    pub points: i32,
}

impl From<ProgressRecord> for CompletionItem {
    fn from(record: ProgressRecord) -> Self {
        Self {
            challenge_id: record.challenge_id.get(),
            completed_at: record.completed_at,
            points: record.points,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ProgressResponse {
    pub total_points: i64,
    pub completed_challenges: u64,
    pub current_challenges: Vec<ActiveChallenge>,
    /// Five most recent completions, newest first.
    pub recent_completions: Vec<CompletionItem>,
}

impl From<ProgressSummary> for ProgressResponse {
    fn from(summary: ProgressSummary) -> Self {
        Self {
            total_points: summary.total_points,
            completed_challenges: summary.completed_count,
            current_challenges: summary
                .active_challenges
                .into_iter()
                .map(ActiveChallenge::from)
                .collect(),
            recent_completions: summary
                .recent_completions
                .into_iter()
                .map(CompletionItem::from)
                .collect(),
        }
    }
}

/// Start a challenge. Starting the same challenge again opens another instance.
#[utoipa::path(
    post,
    path = "/api/challenge/start",
    request_body = ChallengeRequest,
    responses(
        (status = 200, description = "Challenge started", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["challenges"],
    operation_id = "startChallenge",
    security(("bearer" = []))
)]
#[post("/challenge/start")]
pub async fn start_challenge(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
    payload: web::Json<ChallengeRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let challenge_id = ChallengeId::new(payload.challenge_id);
    state.challenges.start(auth.user().id(), challenge_id).await?;
    Ok(web::Json(MessageResponse::new("Challenge started successfully")))
}

/// Complete the oldest started instance of a challenge and award points.
#[utoipa::path(
    post,
    path = "/api/challenge/complete",
    request_body = ChallengeRequest,
    responses(
        (status = 200, description = "Challenge completed", body = CompleteChallengeResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No started instance", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["challenges"],
    operation_id = "completeChallenge",
    security(("bearer" = []))
)]
#[post("/challenge/complete")]
pub async fn complete_challenge(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
    payload: web::Json<ChallengeRequest>,
) -> ApiResult<web::Json<CompleteChallengeResponse>> {
    let challenge_id = ChallengeId::new(payload.challenge_id);
    let record = state
        .challenges
        .complete(auth.user().id(), challenge_id)
        .await?;
    Ok(web::Json(CompleteChallengeResponse {
        message: "Challenge completed successfully".to_owned(),
        points_earned: record.points,
    }))
}

/// Points, completion count, active challenges and recent completions.
#[utoipa::path(
    get,
    path = "/api/progress",
    responses(
        (status = 200, description = "Progress summary", body = ProgressResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["challenges"],
    operation_id = "progress",
    security(("bearer" = []))
)]
#[get("/progress")]
pub async fn progress(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
) -> ApiResult<web::Json<ProgressResponse>> {
    let summary = state.challenges.summary(auth.user().id()).await?;
    Ok(web::Json(ProgressResponse::from(summary)))
}
