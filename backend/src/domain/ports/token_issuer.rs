//! Port for issuing and verifying bearer credentials.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token issuer adapters.
    pub enum TokenError {
        /// Signature, structure, or claims did not check out.
        Invalid => "bearer credential is invalid",
        /// The credential's lifetime has elapsed.
        Expired => "bearer credential has expired",
        /// The adapter could not sign a new credential.
        Signing { message: String } => "failed to sign bearer credential: {message}",
    }
}

/// Signed credential handed to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Turns a verified identity into an opaque bearer credential and back.
///
/// Verification only proves the credential was issued by us and has not
/// expired; callers must still confirm the identity exists.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user_id: &UserId, now: DateTime<Utc>) -> Result<IssuedToken, TokenError>;

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, TokenError>;
}
