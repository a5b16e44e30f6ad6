//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{meals, menu_entries, order_items, orders, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub clearance: i16,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub password_hash: &'a str,
    pub clearance: i16,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Meals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = meals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MealRow {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub caterer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub retired_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = meals)]
pub(crate) struct NewMealRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub category: Option<&'a str>,
    pub price: f64,
    pub image_url: Option<&'a str>,
    pub description: Option<&'a str>,
    pub caterer_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Mutable meal columns. `None` writes SQL `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = meals)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct MealUpdate<'a> {
    pub name: &'a str,
    pub category: Option<&'a str>,
    pub price: f64,
    pub image_url: Option<&'a str>,
    pub description: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Menu entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = menu_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MenuEntryRow {
    pub day: NaiveDate,
    pub meal_id: Uuid,
    pub added_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = menu_entries)]
pub(crate) struct NewMenuEntryRow {
    pub day: NaiveDate,
    pub meal_id: Uuid,
    pub added_by: Uuid,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub menu_day: NaiveDate,
    pub ordered_at: DateTime<Utc>,
    pub delivered: bool,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderItemRow {
    pub order_id: Uuid,
    pub position: i32,
    pub menu_day: NaiveDate,
    pub meal_id: Uuid,
    pub quantity: i32,
}
