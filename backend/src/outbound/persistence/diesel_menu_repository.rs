//! PostgreSQL-backed `MenuRepository`.
//!
//! A publication is validated and inserted inside one transaction holding
//! the day's advisory lock; `UNIQUE (day, meal_id)` backs the duplicate check.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{MenuPersistenceError, MenuPublication, MenuRepository};
use crate::domain::{MealId, MenuEntry, UserId};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::diesel_meal_repository::row_to_meal;
use super::menu_day_queries::{first_missing, first_present, lock_menu_day, published_on};
use super::models::{MealRow, MenuEntryRow, NewMenuEntryRow};
use super::pool::{DbPool, PoolError};
use super::schema::{meals, menu_entries};

/// Diesel implementation of the menu repository port.
#[derive(Clone)]
pub struct DieselMenuRepository {
    pool: DbPool,
}

impl DieselMenuRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a publish transaction.
enum TxError {
    Diesel(diesel::result::Error),
    Menu(MenuPersistenceError),
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_pool_error(error: PoolError) -> MenuPersistenceError {
    map_basic_pool_error(error, MenuPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MenuPersistenceError {
    map_basic_diesel_error(
        error,
        MenuPersistenceError::query,
        MenuPersistenceError::connection,
    )
}

fn to_entry(entry: MenuEntryRow, meal: MealRow) -> Result<MenuEntry, MenuPersistenceError> {
    let meal_id = meal.id;
    if entry.meal_id != meal_id {
        return Err(MenuPersistenceError::query(format!(
            "menu entry for meal {} joined meal {meal_id}",
            entry.meal_id
        )));
    }
    let meal = row_to_meal(meal)
        .map_err(|err| MenuPersistenceError::query(format!("stored meal {meal_id}: {err}")))?;
    Ok(MenuEntry {
        day: entry.day,
        meal,
        added_by: UserId::from_uuid(entry.added_by),
        created_at: entry.created_at,
    })
}

async fn load_entries(
    conn: &mut AsyncPgConnection,
    day: NaiveDate,
    only: Option<&[Uuid]>,
) -> QueryResult<Vec<(MenuEntryRow, MealRow)>> {
    let mut query = menu_entries::table
        .inner_join(meals::table)
        .filter(menu_entries::day.eq(day))
        .filter(meals::retired_at.is_null())
        .order(menu_entries::id.asc())
        .select((MenuEntryRow::as_select(), MealRow::as_select()))
        .into_boxed();
    if let Some(ids) = only {
        query = query.filter(menu_entries::meal_id.eq_any(ids.to_vec()));
    }
    query.load(conn).await
}

async fn publish_locked(
    conn: &mut AsyncPgConnection,
    publication: MenuPublication,
) -> Result<Vec<(MenuEntryRow, MealRow)>, TxError> {
    let requested: Vec<Uuid> = publication
        .meal_ids
        .iter()
        .map(|id| *id.as_uuid())
        .collect();
    lock_menu_day(conn, publication.day).await?;

    let active: HashSet<Uuid> = meals::table
        .filter(meals::id.eq_any(&requested))
        .filter(meals::retired_at.is_null())
        .select(meals::id)
        .load::<Uuid>(conn)
        .await?
        .into_iter()
        .collect();
    if let Some(missing) = first_missing(&requested, &active) {
        return Err(TxError::Menu(MenuPersistenceError::meal_not_found(
            MealId::from_uuid(missing),
        )));
    }

    let already = published_on(conn, publication.day, &requested).await?;
    if let Some(duplicate) = first_present(&requested, &already) {
        return Err(TxError::Menu(MenuPersistenceError::duplicate_menu_entry(
            MealId::from_uuid(duplicate),
        )));
    }

    let rows: Vec<NewMenuEntryRow> = requested
        .iter()
        .map(|meal_id| NewMenuEntryRow {
            day: publication.day,
            meal_id: *meal_id,
            added_by: *publication.added_by.as_uuid(),
            created_at: publication.created_at,
        })
        .collect();
    diesel::insert_into(menu_entries::table)
        .values(&rows)
        .execute(conn)
        .await?;

    Ok(load_entries(conn, publication.day, Some(&requested)).await?)
}

/// After a unique violation, find which requested meal a concurrent writer
/// published first. `None` when that cannot be determined.
async fn colliding_meal(
    conn: &mut AsyncPgConnection,
    publication: &MenuPublication,
) -> Option<MealId> {
    let requested: Vec<Uuid> = publication
        .meal_ids
        .iter()
        .map(|id| *id.as_uuid())
        .collect();
    let present = published_on(conn, publication.day, &requested).await.ok()?;
    first_present(&requested, &present).map(MealId::from_uuid)
}

#[async_trait]
impl MenuRepository for DieselMenuRepository {
    async fn publish(
        &self,
        publication: &MenuPublication,
    ) -> Result<Vec<MenuEntry>, MenuPersistenceError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let owned = publication.clone();

        let outcome = conn
            .transaction(|conn| async move { publish_locked(conn, owned).await }.scope_boxed())
            .await;
        let rows = match outcome {
            Ok(rows) => rows,
            Err(TxError::Menu(menu)) => return Err(menu),
            Err(TxError::Diesel(error)) => {
                if unique_violation(&error).is_some() {
                    if let Some(meal_id) = colliding_meal(conn, publication).await {
                        return Err(MenuPersistenceError::duplicate_menu_entry(meal_id));
                    }
                }
                return Err(map_diesel_error(error));
            }
        };
        rows.into_iter()
            .map(|(entry, meal)| to_entry(entry, meal))
            .collect()
    }

    async fn entries_for_day(
        &self,
        day: NaiveDate,
    ) -> Result<Vec<MenuEntry>, MenuPersistenceError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let rows = load_entries(&mut pooled, day, None)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(entry, meal)| to_entry(entry, meal))
            .collect()
    }
}
