//! Authentication inputs: login credentials and registration requests.
//!
//! Constructors validate raw strings before a handler talks to a service, so
//! services only ever see well-formed values. Passwords are held in
//! [`Zeroizing`] buffers and wiped on drop.

use zeroize::Zeroizing;

use super::user::{Email, UserValidationError, Username};

/// Validation failures for login and registration payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Username or email failed identity validation.
    #[error(transparent)]
    Identity(#[from] UserValidationError),
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

impl CredentialsValidationError {
    /// Name of the offending payload field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Identity(
                UserValidationError::EmptyUsername | UserValidationError::UsernameTooLong { .. },
            ) => "username",
            Self::Identity(UserValidationError::EmptyEmail | UserValidationError::InvalidEmail) => {
                "email"
            }
            Self::Identity(UserValidationError::EmptyId | UserValidationError::InvalidId) => "id",
            Self::EmptyPassword => "password",
        }
    }
}

fn require_password(password: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if password.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty; surrounding whitespace is kept as typed.
///
/// # Examples
/// ```
/// use wellness::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" alice ", "pw").unwrap();
/// assert_eq!(creds.username().as_ref(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw username/password input.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            password: require_password(password)?,
        })
    }

    /// Username used for the lookup.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password as supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    email: Email,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw registration input.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            email: Email::new(email)?,
            password: require_password(password)?,
        })
    }

    /// Requested username.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Requested email address.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Clear-text password to be hashed.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
