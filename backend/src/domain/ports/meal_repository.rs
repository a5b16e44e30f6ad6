//! Port abstraction for catalog persistence.
use async_trait::async_trait;

use crate::domain::{Meal, MealId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by meal repository adapters.
    pub enum MealPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "meal repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "meal repository query failed: {message}",
    }
}

/// Catalog storage. Retired meals are invisible to every method here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MealRepository: Send + Sync {
    async fn insert(&self, meal: &Meal) -> Result<(), MealPersistenceError>;

    async fn find(&self, id: &MealId) -> Result<Option<Meal>, MealPersistenceError>;

    /// Active meals, oldest first.
    async fn list(&self) -> Result<Vec<Meal>, MealPersistenceError>;

    /// Overwrite the mutable fields of an active meal. Returns `false` when
    /// no active meal has this id.
    async fn update(&self, meal: &Meal) -> Result<bool, MealPersistenceError>;

    /// Retire an active meal. Returns `false` when no active meal has this id.
    async fn retire(&self, id: &MealId) -> Result<bool, MealPersistenceError>;
}
