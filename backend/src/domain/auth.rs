//! Authentication primitives: login credentials and registration requests.
//!
//! Handlers build these from raw payload strings so services only ever see
//! validated input.

use zeroize::Zeroizing;

use super::clearance::Clearance;
use super::user::{Email, UserValidationError, Username};

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    #[error(transparent)]
    User(#[from] UserValidationError),
}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty; surrounding whitespace is preserved.
///
/// # Examples
/// ```
/// use meal_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada ", "pw").unwrap();
/// assert_eq!(creds.username(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(CredentialValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated signup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    password: Zeroizing<String>,
    email: Option<Email>,
    clearance: Clearance,
}

impl Registration {
    /// Build a registration; clearance defaults to [`Clearance::Customer`].
    pub fn try_from_parts(
        username: &str,
        password: &str,
        email: Option<&str>,
        clearance: Option<Clearance>,
    ) -> Result<Self, CredentialValidationError> {
        if username.trim().is_empty() {
            return Err(CredentialValidationError::EmptyUsername);
        }
        let username = Username::new(username)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        let email = email
            .filter(|raw| !raw.trim().is_empty())
            .map(Email::new)
            .transpose()?;
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
            email,
            clearance: clearance.unwrap_or_default(),
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn clearance(&self) -> Clearance {
        self.clearance
    }
}
