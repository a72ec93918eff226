//! Session token secret configuration.
//!
//! Reads the signing secret from the environment and validates it against the
//! build mode, so a release binary never starts with a weak or generated key.

use mockable::Env;
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::warn;
use zeroize::Zeroize;

use crate::domain::TokenSecret;

pub(crate) const TOKEN_SECRET_ENV: &str = "WELLNESS_TOKEN_SECRET";
pub(crate) const ALLOW_DEV_SECRET_ENV: &str = "WELLNESS_ALLOW_DEV_SECRET";
/// Shortest secret accepted in release builds (256 bits).
pub const TOKEN_SECRET_MIN_LEN: usize = 32;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate missing settings and warn.
    Debug,
    /// Release builds require explicit, valid settings.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wellness::inbound::http::token_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    pub fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while validating token configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TokenConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// The configured secret is too short for release builds.
    #[error("WELLNESS_TOKEN_SECRET too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort { length: usize, min_len: usize },
    /// Release builds must not fall back to a generated secret.
    #[error("WELLNESS_ALLOW_DEV_SECRET must be 0 in release builds")]
    DevSecretNotAllowed,
}

/// Load the token signing secret.
///
/// Debug builds without `WELLNESS_TOKEN_SECRET` generate a random secret, so
/// tokens do not survive a restart. Setting `WELLNESS_ALLOW_DEV_SECRET=0`
/// turns that fallback off.
///
/// # Examples
///
/// ```rust
/// use mockable::MockEnv;
/// use wellness::inbound::http::token_config::{BuildMode, token_secret_from_env};
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "WELLNESS_TOKEN_SECRET" => Some("0123456789abcdef0123456789abcdef".to_owned()),
///     _ => None,
/// });
///
/// let secret = token_secret_from_env(&env, BuildMode::Release).unwrap();
/// assert_eq!(secret.len(), 32);
/// ```
pub fn token_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSecret, TokenConfigError> {
    let allow_dev_secret = allow_dev_secret_from_env(env, mode)?;

    let Some(mut raw) = env.string(TOKEN_SECRET_ENV) else {
        if mode.is_debug() && allow_dev_secret {
            warn!("{TOKEN_SECRET_ENV} not set; using a temporary secret (dev only)");
            return Ok(generated_secret());
        }
        return Err(TokenConfigError::MissingEnv {
            name: TOKEN_SECRET_ENV,
        });
    };

    let length = raw.len();
    if length < TOKEN_SECRET_MIN_LEN {
        if mode.is_debug() {
            warn!(
                length,
                min_len = TOKEN_SECRET_MIN_LEN,
                "{TOKEN_SECRET_ENV} is shorter than recommended"
            );
        } else {
            raw.zeroize();
            return Err(TokenConfigError::SecretTooShort {
                length,
                min_len: TOKEN_SECRET_MIN_LEN,
            });
        }
    }
    if length == 0 {
        return Err(TokenConfigError::InvalidEnv {
            name: TOKEN_SECRET_ENV,
            value: String::new(),
            expected: "a non-empty secret",
        });
    }

    let secret = TokenSecret::new(raw.as_bytes());
    raw.zeroize();
    Ok(secret)
}

fn allow_dev_secret_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenConfigError> {
    match env.string(ALLOW_DEV_SECRET_ENV) {
        Some(value) => match parse_bool(&value) {
            Some(true) if !mode.is_debug() => Err(TokenConfigError::DevSecretNotAllowed),
            Some(flag) => Ok(flag),
            None => {
                if mode.is_debug() {
                    warn!(
                        value = %value,
                        "invalid {ALLOW_DEV_SECRET_ENV}; defaulting to enabled"
                    );
                    Ok(true)
                } else {
                    Err(TokenConfigError::InvalidEnv {
                        name: ALLOW_DEV_SECRET_ENV,
                        value,
                        expected: BOOL_EXPECTED,
                    })
                }
            }
        },
        None => Ok(mode.is_debug()),
    }
}

fn generated_secret() -> TokenSecret {
    let mut bytes = vec![0_u8; TOKEN_SECRET_MIN_LEN];
    OsRng.fill_bytes(&mut bytes);
    let secret = TokenSecret::new(bytes.as_slice());
    bytes.zeroize();
    secret
}

/// Parse the boolean spellings accepted by every flag variable.
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
