//! PostgreSQL-backed `MealRepository`.
//!
//! Retired meals keep their row (orders still reference them) but are
//! invisible to every read here.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MealPersistenceError, MealRepository};
use crate::domain::{Meal, MealId, MealValidationError, Price, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{MealRow, MealUpdate, NewMealRow};
use super::pool::{DbPool, PoolError};
use super::schema::meals;

/// Diesel implementation of the meal repository port.
#[derive(Clone)]
pub struct DieselMealRepository {
    pool: DbPool,
}

impl DieselMealRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MealPersistenceError {
    map_basic_pool_error(error, MealPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MealPersistenceError {
    map_basic_diesel_error(
        error,
        MealPersistenceError::query,
        MealPersistenceError::connection,
    )
}

/// Rebuild a domain meal; a stored price that no longer validates is corrupt.
pub(super) fn row_to_meal(row: MealRow) -> Result<Meal, MealValidationError> {
    let price = Price::new(row.price)?;
    Ok(Meal {
        id: MealId::from_uuid(row.id),
        name: row.name,
        category: row.category,
        price,
        image_url: row.image_url,
        description: row.description,
        caterer: UserId::from_uuid(row.caterer_id),
        created_at: row.created_at,
        retired: row.retired_at.is_some(),
    })
}

fn decode(row: MealRow) -> Result<Meal, MealPersistenceError> {
    let id = row.id;
    row_to_meal(row)
        .map_err(|err| MealPersistenceError::query(format!("stored meal {id}: {err}")))
}

#[async_trait]
impl MealRepository for DieselMealRepository {
    async fn insert(&self, meal: &Meal) -> Result<(), MealPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewMealRow {
            id: *meal.id.as_uuid(),
            name: &meal.name,
            category: meal.category.as_deref(),
            price: meal.price.value(),
            image_url: meal.image_url.as_deref(),
            description: meal.description.as_deref(),
            caterer_id: *meal.caterer.as_uuid(),
            created_at: meal.created_at,
        };
        diesel::insert_into(meals::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find(&self, id: &MealId) -> Result<Option<Meal>, MealPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = meals::table
            .find(id.as_uuid())
            .filter(meals::retired_at.is_null())
            .select(MealRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(decode).transpose()
    }

    async fn list(&self) -> Result<Vec<Meal>, MealPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MealRow> = meals::table
            .filter(meals::retired_at.is_null())
            .order((meals::created_at.asc(), meals::id.asc()))
            .select(MealRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(decode).collect()
    }

    async fn update(&self, meal: &Meal) -> Result<bool, MealPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = MealUpdate {
            name: &meal.name,
            category: meal.category.as_deref(),
            price: meal.price.value(),
            image_url: meal.image_url.as_deref(),
            description: meal.description.as_deref(),
        };
        let updated = diesel::update(
            meals::table
                .find(meal.id.as_uuid())
                .filter(meals::retired_at.is_null()),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn retire(&self, id: &MealId) -> Result<bool, MealPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let retired = diesel::update(
            meals::table
                .find(id.as_uuid())
                .filter(meals::retired_at.is_null()),
        )
        .set(meals::retired_at.eq(Some(Utc::now())))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(retired > 0)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn row(price: f64) -> MealRow {
        MealRow {
            id: Uuid::new_v4(),
            name: "Tomato soup".to_owned(),
            category: Some("soup".to_owned()),
            price,
            image_url: None,
            description: None,
            caterer_id: Uuid::new_v4(),
            created_at: Utc::now(),
            retired_at: None,
        }
    }

    #[rstest]
    fn rows_become_active_meals() {
        let meal = decode(row(5.0)).expect("valid row");
        assert_eq!(meal.price.value(), 5.0);
        assert_eq!(meal.category.as_deref(), Some("soup"));
        assert!(!meal.retired);
    }

    #[rstest]
    fn corrupt_prices_are_query_errors() {
        let err = decode(row(-1.0)).expect_err("negative price");
        assert!(matches!(err, MealPersistenceError::Query { .. }));
    }
}
