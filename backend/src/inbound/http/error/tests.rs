//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde::Deserialize;
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-00000000beef";

async fn render(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let trace_header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii header").to_owned());
    let bytes = to_bytes(response.into_body()).await.expect("body");
    (
        status,
        trace_header,
        serde_json::from_slice(&bytes).expect("JSON body"),
    )
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("clash"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn each_code_has_a_status(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

#[rstest]
#[actix_web::test]
async fn internal_detail_never_reaches_the_body() {
    let error = Error::internal("connection string postgres://secret@db")
        .with_trace_id(TRACE_ID.to_owned())
        .with_details(json!({ "table": "users" }));

    let (status, trace_header, body) = render(&error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(trace_header.as_deref(), Some(TRACE_ID));
    assert_eq!(
        body,
        json!({
            "code": "internal_error",
            "message": "Internal server error",
            "traceId": TRACE_ID,
        })
    );
}

#[rstest]
#[actix_web::test]
async fn client_errors_are_rendered_as_is() {
    let error = Error::invalid_request("Email already exists")
        .with_details(json!({ "field": "email", "code": "duplicate_email" }));

    let (status, trace_header, body) = render(&error).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(trace_header.is_none());
    assert_eq!(body["message"], "Email already exists");
    assert_eq!(body["details"]["code"], "duplicate_email");
    assert!(body.get("traceId").is_none());
}

#[derive(Deserialize)]
struct MoodBody {
    #[expect(dead_code, reason = "only deserialised to exercise the extractor")]
    mood: i32,
}

#[rstest]
#[case(r#"{"mood":"happy"}"#)]
#[case("{")]
#[actix_web::test]
async fn malformed_json_uses_error_schema(#[case] payload: &'static str) {
    let app = actix_test::init_service(App::new().app_data(json_config()).route(
        "/mood",
        web::post().to(|_: web::Json<MoodBody>| async { HttpResponse::Ok().finish() }),
    ))
    .await;

    let request = actix_test::TestRequest::post()
        .uri("/mood")
        .insert_header(("content-type", "application/json"))
        .set_payload(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["message"], "Invalid request body");
    assert!(body["details"]["reason"].is_string());
}
