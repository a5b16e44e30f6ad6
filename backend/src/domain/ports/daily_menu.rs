//! Driving port for the per-day menu.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Actor, Error, MealId, MenuEntry};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DailyMenu: Send + Sync {
    /// Add `meal_ids` to the menu for `day` (today when `None`), all or none.
    async fn publish(
        &self,
        actor: &Actor,
        day: Option<NaiveDate>,
        meal_ids: Vec<MealId>,
    ) -> Result<Vec<MenuEntry>, Error>;

    /// Entries on the menu for `day` (today when `None`).
    async fn today(&self, actor: &Actor, day: Option<NaiveDate>) -> Result<Vec<MenuEntry>, Error>;
}
