//! Bearer-token authentication for protected handlers.
//!
//! Handlers take an [`AuthenticatedUser`] argument; extraction reads the
//! `Authorization: Bearer <token>` header, verifies the token and loads the
//! account it names. Every failure is a `401` with the same message so
//! clients cannot tell a bad signature from an expired token or a deleted
//! account.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, ErrorCode, User};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";
const INVALID_TOKEN: &str = "Invalid authentication credentials";

/// The account resolved from the request's bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn user(&self) -> &User {
        &self.0
    }

    pub fn into_inner(self) -> User {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("Not authenticated"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized(INVALID_TOKEN))?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized(INVALID_TOKEN))?;
    Ok(token.to_owned())
}

async fn resolve(state: web::Data<HttpState>, token: String) -> Result<User, Error> {
    let user_id = state
        .tokens
        .verify(&token)
        .map_err(|_| Error::unauthorized(INVALID_TOKEN))?;
    match state.credentials.lookup(&user_id).await {
        Ok(user) => Ok(user),
        Err(err) if err.code() == ErrorCode::NotFound => {
            debug!(user_id = %user_id, "token names an unknown user");
            Err(Error::unauthorized("User not found"))
        }
        Err(err) => Err(err),
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not registered"))?;
            resolve(state, token?).await.map(AuthenticatedUser)
        })
    }
}
