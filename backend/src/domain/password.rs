//! Salted password hashing with Argon2id.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=...`), which embed the
//! per-record salt and the cost parameters, so verification keeps working if
//! the configured cost changes later.

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version};
use rand::rngs::OsRng;

/// Failures raised while hashing or verifying passwords.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// Cost parameters were rejected by Argon2.
    #[error("invalid argon2 parameters: {message}")]
    Params { message: String },
    /// Hashing failed.
    #[error("password hashing failed: {message}")]
    Hash { message: String },
    /// The stored hash is not a parseable PHC string.
    #[error("stored password hash is malformed: {message}")]
    MalformedHash { message: String },
}

/// Argon2id hasher with fixed cost parameters.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default()),
        }
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

impl PasswordHasher {
    /// Hasher using the OWASP-recommended Argon2id defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with explicit cost parameters (memory in KiB).
    ///
    /// # Examples
    /// ```
    /// use wellness::domain::PasswordHasher;
    ///
    /// let hasher = PasswordHasher::with_cost(1024, 1, 1).unwrap();
    /// let hash = hasher.hash("pw").unwrap();
    /// assert!(hasher.verify("pw", &hash).unwrap());
    /// ```
    pub fn with_cost(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordHashError> {
        let params = Params::new(memory_kib, iterations, parallelism, None).map_err(|err| {
            PasswordHashError::Params {
                message: err.to_string(),
            }
        })?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash `password` with a freshly generated salt.
    pub fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::Hash {
                message: err.to_string(),
            })
    }

    /// Check `password` against a stored PHC string.
    ///
    /// Returns `Ok(false)` on mismatch; errors are reserved for hashes that
    /// cannot be parsed or evaluated.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(stored).map_err(|err| PasswordHashError::MalformedHash {
            message: err.to_string(),
        })?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::Hash {
                message: err.to_string(),
            }),
        }
    }
}
