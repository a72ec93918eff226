//! Test helpers for inbound HTTP components.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::Trace;

use super::error::json_config;
use super::state::HttpState;

/// The API routes wired the way the server wires them, minus probes and docs.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .wrap(Trace)
        .service(super::api_scope())
}

/// `Authorization` header value for a freshly issued token.
pub fn bearer_for(state: &HttpState, user_id: &crate::domain::UserId) -> String {
    let token = state.tokens.issue(user_id).expect("token issues");
    format!("Bearer {token}")
}
