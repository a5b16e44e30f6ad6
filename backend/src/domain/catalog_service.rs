//! Menu catalog service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    MealCatalog, MealChanges, MealPersistenceError, MealRepository, NewMeal,
};
use crate::domain::{
    Actor, Clearance, Error, Meal, MealDraft, MealId, MealPatch, MealValidationError,
    require_clearance,
};

fn map_meal_error(error: MealPersistenceError) -> Error {
    match error {
        MealPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("meal repository unavailable: {message}"))
        }
        MealPersistenceError::Query { message } => {
            Error::internal(format!("meal repository error: {message}"))
        }
    }
}

fn invalid_meal(error: MealValidationError) -> Error {
    let err = Error::invalid_request(error.to_string());
    match error.field() {
        Some(field) => err.with_details(json!({ "field": field })),
        None => err,
    }
}

fn meal_not_found(id: MealId) -> Error {
    Error::not_found(format!("meal {id} not found"))
}

/// Catalog service implementing [`MealCatalog`].
#[derive(Clone)]
pub struct CatalogService<M> {
    meals: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<M> CatalogService<M> {
    pub fn new(meals: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self { meals, clock }
    }
}

#[async_trait]
impl<M> MealCatalog for CatalogService<M>
where
    M: MealRepository,
{
    async fn create_meal(&self, actor: &Actor, meal: NewMeal) -> Result<Meal, Error> {
        require_clearance(actor, Clearance::Caterer)?;
        let draft = MealDraft::try_from_parts(
            &meal.name,
            meal.category.as_deref(),
            meal.price,
            meal.image_url.as_deref(),
            meal.description.as_deref(),
        )
        .map_err(invalid_meal)?;

        let meal = draft.into_meal(MealId::random(), actor.id, self.clock.utc());
        self.meals.insert(&meal).await.map_err(map_meal_error)?;
        info!(meal_id = %meal.id, caterer = %actor.id, "meal created");
        Ok(meal)
    }

    async fn get_meal(&self, actor: &Actor, id: MealId) -> Result<Meal, Error> {
        require_clearance(actor, Clearance::Caterer)?;
        self.meals
            .find(&id)
            .await
            .map_err(map_meal_error)?
            .ok_or_else(|| meal_not_found(id))
    }

    async fn list_meals(&self, actor: &Actor) -> Result<Vec<Meal>, Error> {
        require_clearance(actor, Clearance::Caterer)?;
        self.meals.list().await.map_err(map_meal_error)
    }

    async fn update_meal(
        &self,
        actor: &Actor,
        id: MealId,
        changes: MealChanges,
    ) -> Result<Meal, Error> {
        require_clearance(actor, Clearance::Caterer)?;
        let patch = MealPatch::try_from_parts(
            changes.name.as_deref(),
            changes.category.as_deref(),
            changes.price,
            changes.image_url.as_deref(),
            changes.description.as_deref(),
        )
        .map_err(invalid_meal)?;

        let current = self
            .meals
            .find(&id)
            .await
            .map_err(map_meal_error)?
            .ok_or_else(|| meal_not_found(id))?;
        let updated = patch.apply_to(current);
        if !self.meals.update(&updated).await.map_err(map_meal_error)? {
            return Err(meal_not_found(id));
        }
        info!(meal_id = %id, editor = %actor.id, "meal updated");
        Ok(updated)
    }

    async fn delete_meal(&self, actor: &Actor, id: MealId) -> Result<(), Error> {
        require_clearance(actor, Clearance::Caterer)?;
        if !self.meals.retire(&id).await.map_err(map_meal_error)? {
            return Err(meal_not_found(id));
        }
        info!(meal_id = %id, editor = %actor.id, "meal retired");
        Ok(())
    }
}

#[cfg(test)]
#[path = "catalog_service_tests.rs"]
mod tests;
