//! Driving ports for account lifecycle and bearer credential resolution.
//!
//! Inbound adapters call these to register, log in, delete the calling user,
//! and turn an `Authorization` header into an [`Actor`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Actor, Error, LoginCredentials, Registration, User};

/// Authenticated user plus the bearer credential issued for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create a user and issue its first credential.
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// Check a username/password pair and issue a credential.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;

    /// Delete the calling user. Outstanding credentials stop resolving.
    async fn remove(&self, actor: &Actor) -> Result<(), Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve a raw bearer credential to the current state of its user.
    async fn resolve(&self, token: &str) -> Result<Actor, Error>;
}
