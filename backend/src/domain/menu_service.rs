//! Daily menu service.
//!
//! Publishing is all-or-nothing: an empty request, a repeated meal, an
//! unknown or retired meal, or a meal already on the day's menu rejects the
//! whole call and leaves the menu untouched.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{DailyMenu, MenuPersistenceError, MenuPublication, MenuRepository};
use crate::domain::{Actor, Clearance, Error, MealId, MenuEntry, require_clearance};

fn map_menu_error(error: MenuPersistenceError) -> Error {
    match error {
        MenuPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("menu repository unavailable: {message}"))
        }
        MenuPersistenceError::Query { message } => {
            Error::internal(format!("menu repository error: {message}"))
        }
        MenuPersistenceError::MealNotFound { meal_id } => {
            Error::not_found(format!("meal {meal_id} not found"))
                .with_details(json!({ "mealId": meal_id }))
        }
        MenuPersistenceError::DuplicateMenuEntry { meal_id } => {
            Error::conflict(format!("meal {meal_id} is already on the menu"))
                .with_details(json!({ "mealId": meal_id }))
        }
    }
}

/// Daily menu service implementing [`DailyMenu`].
#[derive(Clone)]
pub struct MenuService<R> {
    menu: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> MenuService<R> {
    pub fn new(menu: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { menu, clock }
    }

    fn resolve_day(&self, day: Option<NaiveDate>) -> NaiveDate {
        day.unwrap_or_else(|| self.clock.utc().date_naive())
    }
}

fn ensure_distinct(meal_ids: &[MealId]) -> Result<(), Error> {
    let mut seen = HashSet::with_capacity(meal_ids.len());
    match meal_ids.iter().find(|id| !seen.insert(**id)) {
        Some(repeated) => Err(
            Error::conflict(format!("meal {repeated} is listed more than once"))
                .with_details(json!({ "mealId": repeated })),
        ),
        None => Ok(()),
    }
}

#[async_trait]
impl<R> DailyMenu for MenuService<R>
where
    R: MenuRepository,
{
    async fn publish(
        &self,
        actor: &Actor,
        day: Option<NaiveDate>,
        meal_ids: Vec<MealId>,
    ) -> Result<Vec<MenuEntry>, Error> {
        require_clearance(actor, Clearance::Caterer)?;
        if meal_ids.is_empty() {
            return Err(Error::invalid_request("at least one meal id is required")
                .with_details(json!({ "field": "mealIds" })));
        }
        ensure_distinct(&meal_ids)?;

        let publication = MenuPublication {
            day: self.resolve_day(day),
            meal_ids,
            added_by: actor.id,
            created_at: self.clock.utc(),
        };
        let entries = self
            .menu
            .publish(&publication)
            .await
            .map_err(map_menu_error)?;
        info!(
            day = %publication.day,
            meals = entries.len(),
            publisher = %actor.id,
            "menu published"
        );
        Ok(entries)
    }

    async fn today(&self, actor: &Actor, day: Option<NaiveDate>) -> Result<Vec<MenuEntry>, Error> {
        require_clearance(actor, Clearance::Customer)?;
        self.menu
            .entries_for_day(self.resolve_day(day))
            .await
            .map_err(map_menu_error)
    }
}

#[cfg(test)]
#[path = "menu_service_tests.rs"]
mod tests;
