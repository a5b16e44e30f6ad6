//! Queries shared by the menu and order repositories.
//!
//! Publishing a menu and ordering from it both take the same per-day
//! transaction-scoped advisory lock, so an order never observes a half
//! published menu.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use diesel::QueryResult;
use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use super::schema::{meals, menu_entries};

/// First key of the two-key advisory lock; the second is the day number.
const MENU_DAY_LOCK_NAMESPACE: i32 = 0x4d45_4e55;

/// Block until this transaction holds the lock for `day`.
///
/// Released automatically at commit or rollback.
pub(super) async fn lock_menu_day(conn: &mut AsyncPgConnection, day: NaiveDate) -> QueryResult<()> {
    diesel::sql_query("SELECT pg_advisory_xact_lock($1, $2)")
        .bind::<Integer, _>(MENU_DAY_LOCK_NAMESPACE)
        .bind::<Integer, _>(day.num_days_from_ce())
        .execute(conn)
        .await?;
    Ok(())
}

/// Which of `meal_ids` are on the menu for `day` and not retired.
pub(super) async fn meals_on_menu(
    conn: &mut AsyncPgConnection,
    day: NaiveDate,
    meal_ids: &[Uuid],
) -> QueryResult<HashSet<Uuid>> {
    let found: Vec<Uuid> = menu_entries::table
        .inner_join(meals::table)
        .filter(menu_entries::day.eq(day))
        .filter(menu_entries::meal_id.eq_any(meal_ids))
        .filter(meals::retired_at.is_null())
        .select(menu_entries::meal_id)
        .load(conn)
        .await?;
    Ok(found.into_iter().collect())
}

/// The first id of `requested`, in request order, missing from `present`.
pub(super) fn first_missing(requested: &[Uuid], present: &HashSet<Uuid>) -> Option<Uuid> {
    requested.iter().copied().find(|id| !present.contains(id))
}

/// The first id of `requested`, in request order, contained in `present`.
pub(super) fn first_present(requested: &[Uuid], present: &HashSet<Uuid>) -> Option<Uuid> {
    requested.iter().copied().find(|id| present.contains(id))
}

/// Which of `meal_ids` already have an entry for `day`, retired or not.
pub(super) async fn published_on(
    conn: &mut AsyncPgConnection,
    day: NaiveDate,
    meal_ids: &[Uuid],
) -> QueryResult<HashSet<Uuid>> {
    let found: Vec<Uuid> = menu_entries::table
        .filter(menu_entries::day.eq(day))
        .filter(menu_entries::meal_id.eq_any(meal_ids))
        .select(menu_entries::meal_id)
        .load(conn)
        .await?;
    Ok(found.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn first_missing_respects_request_order() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let present: HashSet<Uuid> = [a].into_iter().collect();
        assert_eq!(first_missing(&[a, c, b], &present), Some(c));
        assert_eq!(first_missing(&[a], &present), None);
    }

    #[rstest]
    fn first_present_names_the_earliest_requested_collision() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let present: HashSet<Uuid> = [c, b].into_iter().collect();
        assert_eq!(first_present(&[a, b, c], &present), Some(b));
        assert_eq!(first_present(&[a], &present), None);
    }
}
