//! Port abstraction for the credential store and its errors.
use async_trait::async_trait;

use crate::domain::{StoredUser, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already holds this username.
        DuplicateUsername { username: String } => "username {username} is already taken",
        /// Another user already registered this email address.
        DuplicateEmail { email: String } => "email {email} is already registered",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; uniqueness violations surface as `Duplicate*`.
    async fn insert(&self, user: &StoredUser) -> Result<(), UserPersistenceError>;

    /// Fetch a user together with its password hash.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredUser>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Delete a user, returning whether a record was removed.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}
