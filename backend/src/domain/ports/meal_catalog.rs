//! Driving port for catalog management.

use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{Actor, Error, Meal, MealId};

/// Unvalidated fields for a new meal.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewMeal {
    #[schema(example = "Tomato soup")]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[schema(example = 5.0)]
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Unvalidated partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MealChanges {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Every operation requires caterer clearance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MealCatalog: Send + Sync {
    async fn create_meal(&self, actor: &Actor, meal: NewMeal) -> Result<Meal, Error>;

    async fn get_meal(&self, actor: &Actor, id: MealId) -> Result<Meal, Error>;

    async fn list_meals(&self, actor: &Actor) -> Result<Vec<Meal>, Error>;

    async fn update_meal(
        &self,
        actor: &Actor,
        id: MealId,
        changes: MealChanges,
    ) -> Result<Meal, Error>;

    /// Retire the meal; past orders keep referencing it.
    async fn delete_meal(&self, actor: &Actor, id: MealId) -> Result<(), Error>;
}
