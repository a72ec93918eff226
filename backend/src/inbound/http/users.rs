//! Account API handlers.
//!
//! ```text
//! POST /api/auth/register {"username":"alice","email":"a@x.com","password":"pw"}
//! POST /api/auth/login {"username":"alice","password":"pw"}
//! GET /api/auth/me
//! ```

use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    CredentialsValidationError, Error, LoginCredentials, Registration, User, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/auth/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = CredentialsValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.email, &value.password)
    }
}

/// Login request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice")]
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = CredentialsValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "User created successfully")]
    pub message: String,
    pub user_id: String,
}

/// Public identity fields returned alongside a fresh token.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token valid for seven days.
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MeResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for MeResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            created_at: user.created_at(),
        }
    }
}

fn validation_code(err: &CredentialsValidationError) -> &'static str {
    match err {
        CredentialsValidationError::Identity(identity) => match identity {
            UserValidationError::EmptyUsername => "empty_username",
            UserValidationError::UsernameTooLong { .. } => "username_too_long",
            UserValidationError::EmptyEmail => "empty_email",
            UserValidationError::InvalidEmail => "invalid_email",
            UserValidationError::EmptyId | UserValidationError::InvalidId => "invalid_id",
        },
        CredentialsValidationError::EmptyPassword => "empty_password",
    }
}

fn map_validation_error(err: &CredentialsValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": validation_code(err) }))
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid input or duplicate username/email", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<RegisterResponse>> {
    let registration = Registration::try_from(payload.into_inner())
        .map_err(|err| map_validation_error(&err))?;
    let user_id = state.credentials.register(&registration).await?;
    Ok(web::Json(RegisterResponse {
        message: "User created successfully".to_owned(),
        user_id: user_id.to_string(),
    }))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(|err| map_validation_error(&err))?;
    let user = state.credentials.authenticate(&credentials).await?;
    let token = state.tokens.issue(user.id()).map_err(|err| {
        Error::internal(format!("failed to issue session token: {err}"))
    })?;
    info!(user_id = %user.id(), "session token issued");
    Ok(web::Json(LoginResponse {
        token,
        user: UserSummary::from(&user),
    }))
}

/// Profile of the authenticated account.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser",
    security(("bearer" = []))
)]
#[get("/auth/me")]
pub async fn current_user(auth: AuthenticatedUser) -> web::Json<MeResponse> {
    web::Json(MeResponse::from(auth.user()))
}
