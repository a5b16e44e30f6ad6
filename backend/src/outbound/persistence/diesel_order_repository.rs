//! PostgreSQL-backed `OrderRepository`.
//!
//! Placing an order re-checks its meals against the menu under the day's
//! advisory lock; updates lock the order row and re-check replacement meals
//! against the order's own menu day.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{OrderPersistenceError, OrderRepository};
use crate::domain::{LineItem, MealId, Order, OrderId, OrderPatch, Quantity, UserId};

use super::diesel_basic_error_mapping::{
    foreign_key_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::menu_day_queries::{first_missing, lock_menu_day, meals_on_menu, published_on};
use super::models::{OrderItemRow, OrderRow};
use super::pool::{DbPool, PoolError};
use super::schema::{order_items, orders};

/// Line items must reference an existing `(day, meal_id)` menu entry.
const MENU_ENTRY_FKEY: &str = "order_items_menu_entry_fkey";

/// Diesel implementation of the order repository port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

enum TxError {
    Diesel(diesel::result::Error),
    Order(OrderPersistenceError),
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<OrderPersistenceError> for TxError {
    fn from(error: OrderPersistenceError) -> Self {
        Self::Order(error)
    }
}

fn map_pool_error(error: PoolError) -> OrderPersistenceError {
    map_basic_pool_error(error, OrderPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> OrderPersistenceError {
    map_basic_diesel_error(
        error,
        OrderPersistenceError::query,
        OrderPersistenceError::connection,
    )
}

fn map_tx_error(error: TxError) -> OrderPersistenceError {
    match error {
        TxError::Order(order) => order,
        TxError::Diesel(error) => map_diesel_error(error),
    }
}

fn breaks_menu_backstop(error: &TxError) -> bool {
    match error {
        TxError::Diesel(error) => foreign_key_violation(error) == Some(MENU_ENTRY_FKEY),
        TxError::Order(_) => false,
    }
}

/// First of `meals` without a menu entry for `day`, once the transaction
/// that tripped the foreign key has rolled back.
async fn off_menu_meal(
    conn: &mut AsyncPgConnection,
    day: NaiveDate,
    meals: &[Uuid],
) -> Option<MealId> {
    let present = published_on(conn, day, meals).await.ok()?;
    first_missing(meals, &present).map(MealId::from_uuid)
}

fn item_rows(order: &Order) -> Result<Vec<OrderItemRow>, OrderPersistenceError> {
    order
        .items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let position = i32::try_from(position)
                .map_err(|_| OrderPersistenceError::query("too many line items"))?;
            let quantity = i32::try_from(item.quantity.get())
                .map_err(|_| OrderPersistenceError::query("quantity out of range"))?;
            Ok(OrderItemRow {
                order_id: *order.id.as_uuid(),
                position,
                menu_day: order.day,
                meal_id: *item.meal_id.as_uuid(),
                quantity,
            })
        })
        .collect()
}

/// Rebuild an order; `items` must already be sorted by position.
fn rows_to_order(
    row: OrderRow,
    items: Vec<OrderItemRow>,
) -> Result<Order, OrderPersistenceError> {
    let items = items
        .into_iter()
        .map(|item| {
            let quantity = Quantity::new(i64::from(item.quantity)).map_err(|err| {
                OrderPersistenceError::query(format!("stored order {}: {err}", row.id))
            })?;
            Ok(LineItem {
                meal_id: MealId::from_uuid(item.meal_id),
                quantity,
            })
        })
        .collect::<Result<Vec<_>, OrderPersistenceError>>()?;
    Ok(Order {
        id: OrderId::from_uuid(row.id),
        owner: UserId::from_uuid(row.owner_id),
        day: row.menu_day,
        ordered_at: row.ordered_at,
        delivered: row.delivered,
        items,
    })
}

async fn load_items(
    conn: &mut AsyncPgConnection,
    order_ids: &[Uuid],
) -> QueryResult<Vec<OrderItemRow>> {
    order_items::table
        .filter(order_items::order_id.eq_any(order_ids))
        .order((order_items::order_id.asc(), order_items::position.asc()))
        .select(OrderItemRow::as_select())
        .load(conn)
        .await
}

async fn ensure_on_menu(
    conn: &mut AsyncPgConnection,
    order: &Order,
    meals: &[Uuid],
) -> Result<(), TxError> {
    if meals.is_empty() {
        return Ok(());
    }
    lock_menu_day(conn, order.day).await?;
    let present = meals_on_menu(conn, order.day, meals).await?;
    match first_missing(meals, &present) {
        Some(missing) => Err(OrderPersistenceError::meal_not_on_menu(MealId::from_uuid(missing)).into()),
        None => Ok(()),
    }
}

async fn place_locked(conn: &mut AsyncPgConnection, order: Order) -> Result<(), TxError> {
    let meals: Vec<Uuid> = order.items.iter().map(|item| *item.meal_id.as_uuid()).collect();
    ensure_on_menu(conn, &order, &meals).await?;

    let row = OrderRow {
        id: *order.id.as_uuid(),
        owner_id: *order.owner.as_uuid(),
        menu_day: order.day,
        ordered_at: order.ordered_at,
        delivered: order.delivered,
    };
    diesel::insert_into(orders::table)
        .values(&row)
        .execute(conn)
        .await?;
    diesel::insert_into(order_items::table)
        .values(&item_rows(&order)?)
        .execute(conn)
        .await?;
    Ok(())
}

async fn update_locked(
    conn: &mut AsyncPgConnection,
    id: OrderId,
    patch: OrderPatch,
) -> Result<Order, TxError> {
    let row = orders::table
        .find(id.as_uuid())
        .select(OrderRow::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()?
        .ok_or_else(|| OrderPersistenceError::order_not_found(id))?;
    let items = load_items(conn, &[row.id]).await?;
    let current = rows_to_order(row, items)?;

    let updated = patch
        .apply_to(&current)
        .map_err(OrderPersistenceError::rejected)?;
    let replacements: Vec<Uuid> = patch.replacement_meals().map(|m| *m.as_uuid()).collect();
    ensure_on_menu(conn, &current, &replacements).await?;

    if !patch.edits().is_empty() {
        diesel::delete(order_items::table.filter(order_items::order_id.eq(id.as_uuid())))
            .execute(conn)
            .await?;
        diesel::insert_into(order_items::table)
            .values(&item_rows(&updated)?)
            .execute(conn)
            .await?;
    }
    if updated.delivered != current.delivered {
        diesel::update(orders::table.find(id.as_uuid()))
            .set(orders::delivered.eq(updated.delivered))
            .execute(conn)
            .await?;
    }
    Ok(updated)
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn place(&self, order: &Order) -> Result<(), OrderPersistenceError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let owned = order.clone();
        let outcome = conn
            .transaction(|conn| async move { place_locked(conn, owned).await }.scope_boxed())
            .await;
        let Err(error) = outcome else {
            return Ok(());
        };
        if breaks_menu_backstop(&error) {
            let meals: Vec<Uuid> = order.items.iter().map(|item| *item.meal_id.as_uuid()).collect();
            if let Some(meal_id) = off_menu_meal(conn, order.day, &meals).await {
                return Err(OrderPersistenceError::meal_not_on_menu(meal_id));
            }
        }
        Err(map_tx_error(error))
    }

    async fn find(&self, id: &OrderId) -> Result<Option<Order>, OrderPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = orders::table
            .find(id.as_uuid())
            .select(OrderRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let items = load_items(&mut conn, &[row.id])
            .await
            .map_err(map_diesel_error)?;
        rows_to_order(row, items).map(Some)
    }

    async fn list(&self, owner: Option<UserId>) -> Result<Vec<Order>, OrderPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = orders::table
            .order((orders::ordered_at.desc(), orders::id.desc()))
            .select(OrderRow::as_select())
            .into_boxed();
        if let Some(owner) = owner {
            query = query.filter(orders::owner_id.eq(*owner.as_uuid()));
        }
        let rows: Vec<OrderRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut grouped: HashMap<Uuid, Vec<OrderItemRow>> = HashMap::with_capacity(ids.len());
        for item in load_items(&mut conn, &ids)
            .await
            .map_err(map_diesel_error)?
        {
            grouped.entry(item.order_id).or_default().push(item);
        }
        rows.into_iter()
            .map(|row| {
                let items = grouped.remove(&row.id).unwrap_or_default();
                rows_to_order(row, items)
            })
            .collect()
    }

    async fn update(
        &self,
        id: &OrderId,
        patch: &OrderPatch,
    ) -> Result<Order, OrderPersistenceError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let (id, owned) = (*id, patch.clone());
        let outcome = conn
            .transaction(|conn| async move { update_locked(conn, id, owned).await }.scope_boxed())
            .await;
        let error = match outcome {
            Ok(updated) => return Ok(updated),
            Err(error) => error,
        };
        if breaks_menu_backstop(&error) {
            let day = orders::table
                .find(id.as_uuid())
                .select(orders::menu_day)
                .first::<NaiveDate>(conn)
                .await
                .ok();
            let meals: Vec<Uuid> = patch.replacement_meals().map(|m| *m.as_uuid()).collect();
            if let Some(day) = day {
                if let Some(meal_id) = off_menu_meal(conn, day, &meals).await {
                    return Err(OrderPersistenceError::meal_not_on_menu(meal_id));
                }
            }
        }
        Err(map_tx_error(error))
    }
}
