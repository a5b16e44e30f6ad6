//! Port abstraction for daily menu persistence.
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{MealId, MenuEntry, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by menu repository adapters.
    pub enum MenuPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "menu repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "menu repository query failed: {message}",
        /// The meal does not exist or has been retired.
        MealNotFound { meal_id: MealId } => "meal {meal_id} not found",
        /// The meal is already on the menu for that day.
        DuplicateMenuEntry { meal_id: MealId } => "meal {meal_id} is already on the menu",
    }
}

/// A validated publish request for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuPublication {
    pub day: NaiveDate,
    pub meal_ids: Vec<MealId>,
    pub added_by: UserId,
    pub created_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// Add every meal in `publication` to its day, or none of them.
    ///
    /// Implementations serialise publishes for the same day so the
    /// existence and uniqueness checks cannot interleave.
    async fn publish(
        &self,
        publication: &MenuPublication,
    ) -> Result<Vec<MenuEntry>, MenuPersistenceError>;

    /// Entries for `day` whose meals are still active, in insertion order.
    async fn entries_for_day(&self, day: NaiveDate)
    -> Result<Vec<MenuEntry>, MenuPersistenceError>;
}
