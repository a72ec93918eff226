//! Mood log handlers.
//!
//! ```text
//! POST /api/mood/save {"mood":4,"date":"2026-03-01"}
//! GET /api/mood/history
//! ```

use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, MoodEntry, NewMood};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::MessageResponse;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/mood/save`.
///
/// `date` is stored exactly as sent; history ordering compares it as text.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SaveMoodRequest {
    #[schema(example = 4)]
    pub mood: i32,
    #[schema(example = "2026-03-01")]
    pub date: String,
}

/// One history item. Entry and owner ids are not exposed.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MoodHistoryItem {
    pub mood: i32,
    pub date: String,
    pub created_at: DateTime<Utc>,
}

impl From<MoodEntry> for MoodHistoryItem {
    fn from(entry: MoodEntry) -> Self {
        Self {
            mood: entry.mood,
            date: entry.date,
            created_at: entry.created_at,
        }
    }
}

/// Record a mood sample for the caller.
#[utoipa::path(
    post,
    path = "/api/mood/save",
    request_body = SaveMoodRequest,
    responses(
        (status = 200, description = "Mood saved", body = MessageResponse),
        (status = 400, description = "Empty date", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["mood"],
    operation_id = "saveMood",
    security(("bearer" = []))
)]
#[post("/mood/save")]
pub async fn save_mood(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
    payload: web::Json<SaveMoodRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let SaveMoodRequest { mood, date } = payload.into_inner();
    let sample = NewMood::try_from_parts(mood, &date).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "date", "code": "empty_date" }))
    })?;
    state.moods.record(auth.user().id(), sample).await?;
    Ok(web::Json(MessageResponse::new("Mood saved successfully")))
}

/// Up to 30 most recent samples, newest date first.
#[utoipa::path(
    get,
    path = "/api/mood/history",
    responses(
        (status = 200, description = "Mood history", body = [MoodHistoryItem]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["mood"],
    operation_id = "moodHistory",
    security(("bearer" = []))
)]
#[get("/mood/history")]
pub async fn mood_history(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<MoodHistoryItem>>> {
    let entries = state.moods.history(auth.user().id()).await?;
    Ok(web::Json(
        entries.into_iter().map(MoodHistoryItem::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::test as actix_test;
    use chrono::{Days, NaiveDate};
    use rstest::rstest;
    use serde_json::Value;

    use crate::domain::{Registration, UserId};
    use crate::inbound::http::test_utils::{bearer_for, test_app};
    use crate::test_support::{FixedClock, memory_http_state};

    async fn signed_in() -> (HttpState, String) {
        let state = memory_http_state(Arc::new(FixedClock::at_noon(2026, 3, 1)));
        let registration =
            Registration::try_from_parts("alice", "a@x.com", "pw").expect("valid registration");
        let user_id: UserId = state
            .credentials
            .register(&registration)
            .await
            .expect("registration succeeds");
        let bearer = bearer_for(&state, &user_id);
        (state, bearer)
    }

    fn save(bearer: &str, mood: i32, date: &str) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/api/mood/save")
            .insert_header((AUTHORIZATION, bearer.to_owned()))
            .set_json(SaveMoodRequest {
                mood,
                date: date.to_owned(),
            })
    }

    #[rstest]
    #[actix_web::test]
    async fn history_is_newest_date_first_and_hides_ids() {
        let (state, bearer) = signed_in().await;
        let app = actix_test::init_service(test_app(state)).await;
        for (mood, date) in [(3, "2026-02-27"), (5, "2026-03-01"), (2, "2026-02-28")] {
            let request = save(&bearer, mood, date).to_request();
            let response = actix_test::call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let history: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/mood/history")
                .insert_header((AUTHORIZATION, bearer))
                .to_request(),
        )
        .await;
        let items = history.as_array().expect("array body");
        let dates: Vec<&str> = items
            .iter()
            .filter_map(|item| item["date"].as_str())
            .collect();
        assert_eq!(dates, ["2026-03-01", "2026-02-28", "2026-02-27"]);
        assert_eq!(items[0]["mood"], 5);
        assert!(items[0].get("id").is_none());
        assert!(items[0].get("user_id").is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn history_is_capped_at_thirty_newest_entries() {
        let (state, bearer) = signed_in().await;
        let app = actix_test::init_service(test_app(state)).await;
        let first = NaiveDate::from_ymd_opt(2026, 2, 1).expect("valid date");
        // Stride 7 visits all 36 days out of order.
        for step in 0..36_u64 {
            let date = first + Days::new(step * 7 % 36);
            let request = save(&bearer, 3, &date.to_string()).to_request();
            let response = actix_test::call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let history: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/mood/history")
                .insert_header((AUTHORIZATION, bearer))
                .to_request(),
        )
        .await;
        let dates: Vec<&str> = history
            .as_array()
            .expect("array body")
            .iter()
            .filter_map(|item| item["date"].as_str())
            .collect();
        assert_eq!(dates.len(), 30);
        assert_eq!(dates.first(), Some(&"2026-03-08"));
        assert_eq!(dates.last(), Some(&"2026-02-07"));
    }

    #[rstest]
    #[actix_web::test]
    async fn empty_date_is_rejected() {
        let (state, bearer) = signed_in().await;
        let app = actix_test::init_service(test_app(state)).await;

        let request = save(&bearer, 4, "").to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], "date");
    }

    #[rstest]
    #[actix_web::test]
    async fn history_requires_a_token() {
        let (state, _) = signed_in().await;
        let app = actix_test::init_service(test_app(state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/mood/history")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
