//! Stateless session tokens.
//!
//! Tokens are compact HS256 JWTs carrying the user id and an absolute
//! expiry seven days after issuance. Nothing is stored server side, so a
//! token stays valid until it expires; there is no revocation list.
//!
//! Verification collapses every failure (bad encoding, wrong algorithm,
//! signature mismatch, expiry) into [`TokenError::Invalid`] so callers cannot
//! tell the causes apart.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Duration;
use hmac::{Hmac, Mac};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroizing;

use super::user::UserId;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

/// Lifetime of a freshly issued token.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Failures raised by [`SessionTokens`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token is malformed, tampered with, signed with another key, or
    /// expired.
    #[error("invalid or expired token")]
    Invalid,
    /// The token could not be produced.
    #[error("failed to sign token: {message}")]
    Signing { message: String },
}

/// Symmetric signing secret, wiped from memory on drop.
#[derive(Clone)]
pub struct TokenSecret(Zeroizing<Vec<u8>>);

impl TokenSecret {
    /// Wrap raw secret bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    /// Secret length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the secret is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.0).map_err(|err| TokenError::Signing {
            message: err.to_string(),
        })
    }
}

impl std::fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenSecret(<redacted>)")
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    typ: String,
}

/// Claims embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject of the token.
    pub user_id: String,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
}

/// Issues and verifies session tokens with a process-wide secret.
#[derive(Clone)]
pub struct SessionTokens {
    secret: TokenSecret,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl SessionTokens {
    /// Create an issuer using the standard seven-day lifetime.
    pub fn new(secret: TokenSecret, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret,
            clock,
            ttl: Duration::days(TOKEN_TTL_DAYS),
        }
    }

    /// Mint a token for `user_id`, expiring seven days from now.
    pub fn issue(&self, user_id: &UserId) -> Result<String, TokenError> {
        let now = self.clock.utc();
        let claims = TokenClaims {
            user_id: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let header = TokenHeader {
            alg: ALGORITHM.to_owned(),
            typ: TOKEN_TYPE.to_owned(),
        };

        let signing_input = format!("{}.{}", encode_json(&header)?, encode_json(&claims)?);
        let mut mac = self.secret.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{signing_input}.{signature}"))
    }

    /// Resolve a token to the user id it was issued for.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let claims = self.decode(token).inspect_err(|_| {
            debug!("session token rejected");
        })?;
        if claims.exp <= self.clock.utc().timestamp() {
            debug!(user_id = %claims.user_id, "session token expired");
            return Err(TokenError::Invalid);
        }
        UserId::new(&claims.user_id).map_err(|_| TokenError::Invalid)
    }

    fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut parts = token.split('.');
        let (Some(header_segment), Some(payload_segment), Some(signature_segment), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Invalid);
        };

        let header: TokenHeader = decode_json(header_segment)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::Invalid);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_segment)
            .map_err(|_| TokenError::Invalid)?;
        let mut mac = self.secret.mac()?;
        mac.update(header_segment.as_bytes());
        mac.update(b".");
        mac.update(payload_segment.as_bytes());
        mac.verify_slice(&signature).map_err(|_| TokenError::Invalid)?;

        decode_json(payload_segment)
    }
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, TokenError> {
    serde_json::to_vec(value)
        .map(|bytes| URL_SAFE_NO_PAD.encode(bytes))
        .map_err(|err| TokenError::Signing {
            message: err.to_string(),
        })
}

fn decode_json<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Invalid)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Invalid)
}
