//! Credential store service.
//!
//! Implements registration, login, self-deletion, and bearer credential
//! resolution on top of the user repository, a password hasher, and a token
//! issuer.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AccountCommand, AuthSession, IdentityResolver, PasswordHashError, PasswordHasher, TokenError,
    TokenIssuer, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Actor, Error, LoginCredentials, Registration, StoredUser, User, UserId, Username,
};

const INVALID_CREDENTIALS: &str = "invalid username or password";

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { username } => {
            Error::conflict(format!("username {username} is already taken"))
                .with_details(json!({ "field": "username" }))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("email {email} is already registered"))
                .with_details(json!({ "field": "email" }))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn map_token_error(error: TokenError) -> Error {
    match error {
        TokenError::Invalid => Error::unauthorized("bearer credential is invalid"),
        TokenError::Expired => Error::unauthorized("bearer credential has expired"),
        TokenError::Signing { message } => {
            Error::internal(format!("failed to issue credential: {message}"))
        }
    }
}

/// Account service implementing [`AccountCommand`] and [`IdentityResolver`].
#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    clock: Arc<dyn Clock>,
}

impl<U> AccountService<U> {
    pub fn new(
        users: Arc<U>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }

    fn session_for(&self, user: User) -> Result<AuthSession, Error> {
        let issued = self
            .tokens
            .issue(user.id(), self.clock.utc())
            .map_err(map_token_error)?;
        Ok(AuthSession {
            user,
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }
}

#[async_trait]
impl<U> AccountCommand for AccountService<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(map_hash_error)?;
        let user = User::new(
            UserId::random(),
            registration.username().clone(),
            registration.email().cloned(),
            registration.clearance(),
            self.clock.utc(),
        );
        self.users
            .insert(&StoredUser {
                user: user.clone(),
                password_hash,
            })
            .await
            .map_err(map_user_error)?;

        info!(
            user_id = %user.id(),
            username = %user.username(),
            clearance = ?user.clearance(),
            "user registered"
        );
        self.session_for(user)
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        // A name that could never have been registered is just an unknown user.
        let stored = match Username::new(credentials.username()) {
            Ok(username) => self
                .users
                .find_by_username(&username)
                .await
                .map_err(map_user_error)?,
            Err(_) => None,
        };
        let Some(stored) = stored else {
            warn!(reason = "unknown_user", "authentication rejected");
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(map_hash_error)?;
        if !matches {
            warn!(
                reason = "password_mismatch",
                user_id = %stored.user.id(),
                "authentication rejected"
            );
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS));
        }

        debug!(user_id = %stored.user.id(), "user authenticated");
        self.session_for(stored.user)
    }

    async fn remove(&self, actor: &Actor) -> Result<(), Error> {
        let removed = self
            .users
            .delete(&actor.id)
            .await
            .map_err(map_user_error)?;
        if !removed {
            return Err(Error::not_found(format!("user {} not found", actor.id)));
        }
        info!(user_id = %actor.id, username = %actor.username, "user removed");
        Ok(())
    }
}

#[async_trait]
impl<U> IdentityResolver for AccountService<U>
where
    U: UserRepository,
{
    async fn resolve(&self, token: &str) -> Result<Actor, Error> {
        let user_id = self
            .tokens
            .verify(token, self.clock.utc())
            .map_err(map_token_error)?;
        let user = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| {
                debug!(user_id = %user_id, "credential refers to a removed user");
                Error::unauthorized("bearer credential is invalid")
            })?;
        Ok(Actor {
            id: *user.id(),
            username: user.username().clone(),
            clearance: user.clearance(),
        })
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
