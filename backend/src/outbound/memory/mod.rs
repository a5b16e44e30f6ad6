//! In-process implementation of every repository port.
//!
//! All tables sit behind one mutex, so each port call observes and mutates
//! a consistent snapshot. Used when no database is configured and by the
//! behaviour suites.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::ports::{
    MealPersistenceError, MealRepository, MenuPersistenceError, MenuPublication, MenuRepository,
    OrderPersistenceError, OrderRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Meal, MealId, MenuEntry, Order, OrderId, OrderPatch, StoredUser, User, UserId, Username,
};

#[derive(Debug, Clone)]
struct MenuRow {
    day: NaiveDate,
    meal_id: MealId,
    added_by: UserId,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<StoredUser>,
    meals: Vec<Meal>,
    menu: Vec<MenuRow>,
    orders: Vec<Order>,
}

impl Tables {
    fn active_meal(&self, id: MealId) -> Option<&Meal> {
        self.meals
            .iter()
            .find(|meal| meal.id == id && !meal.retired)
    }

    fn on_menu(&self, day: NaiveDate, meal_id: MealId) -> bool {
        self.active_meal(meal_id).is_some()
            && self
                .menu
                .iter()
                .any(|row| row.day == day && row.meal_id == meal_id)
    }

    fn first_off_menu(&self, day: NaiveDate, meals: impl IntoIterator<Item = MealId>) -> Option<MealId> {
        meals.into_iter().find(|meal_id| !self.on_menu(day, *meal_id))
    }

    fn entries(&self, day: NaiveDate, only: Option<&[MealId]>) -> Vec<MenuEntry> {
        self.menu
            .iter()
            .filter(|row| row.day == day)
            .filter(|row| only.is_none_or(|ids| ids.contains(&row.meal_id)))
            .filter_map(|row| {
                self.active_meal(row.meal_id).map(|meal| MenuEntry {
                    day: row.day,
                    meal: meal.clone(),
                    added_by: row.added_by,
                    created_at: row.created_at,
                })
            })
            .collect()
    }
}

/// Shared in-memory store; clone the `Arc` to hand it to several services.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

const POISONED: &str = "in-memory store lock poisoned";

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, &'static str> {
        self.tables.lock().map_err(|_| POISONED)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, stored: &StoredUser) -> Result<(), UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        let user = &stored.user;
        if tables
            .users
            .iter()
            .any(|existing| existing.user.username() == user.username())
        {
            return Err(UserPersistenceError::duplicate_username(
                user.username().as_ref(),
            ));
        }
        if let Some(email) = user.email() {
            if tables
                .users
                .iter()
                .any(|existing| existing.user.email() == Some(email))
            {
                return Err(UserPersistenceError::duplicate_email(email.as_ref()));
            }
        }
        tables.users.push(stored.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables
            .users
            .iter()
            .find(|stored| stored.user.username() == username)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables
            .users
            .iter()
            .find(|stored| stored.user.id() == id)
            .map(|stored| stored.user.clone()))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        let before = tables.users.len();
        tables.users.retain(|stored| stored.user.id() != id);
        Ok(tables.users.len() < before)
    }
}

#[async_trait]
impl MealRepository for InMemoryStore {
    async fn insert(&self, meal: &Meal) -> Result<(), MealPersistenceError> {
        let mut tables = self.lock().map_err(MealPersistenceError::query)?;
        if tables.meals.iter().any(|existing| existing.id == meal.id) {
            return Err(MealPersistenceError::query(format!(
                "meal {} already exists",
                meal.id
            )));
        }
        tables.meals.push(meal.clone());
        Ok(())
    }

    async fn find(&self, id: &MealId) -> Result<Option<Meal>, MealPersistenceError> {
        let tables = self.lock().map_err(MealPersistenceError::query)?;
        Ok(tables.active_meal(*id).cloned())
    }

    async fn list(&self) -> Result<Vec<Meal>, MealPersistenceError> {
        let tables = self.lock().map_err(MealPersistenceError::query)?;
        let mut meals: Vec<Meal> = tables
            .meals
            .iter()
            .filter(|meal| !meal.retired)
            .cloned()
            .collect();
        meals.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(meals)
    }

    async fn update(&self, meal: &Meal) -> Result<bool, MealPersistenceError> {
        let mut tables = self.lock().map_err(MealPersistenceError::query)?;
        let Some(stored) = tables
            .meals
            .iter_mut()
            .find(|stored| stored.id == meal.id && !stored.retired)
        else {
            return Ok(false);
        };
        *stored = Meal {
            retired: false,
            ..meal.clone()
        };
        Ok(true)
    }

    async fn retire(&self, id: &MealId) -> Result<bool, MealPersistenceError> {
        let mut tables = self.lock().map_err(MealPersistenceError::query)?;
        match tables
            .meals
            .iter_mut()
            .find(|meal| meal.id == *id && !meal.retired)
        {
            Some(meal) => {
                meal.retired = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl MenuRepository for InMemoryStore {
    async fn publish(
        &self,
        publication: &MenuPublication,
    ) -> Result<Vec<MenuEntry>, MenuPersistenceError> {
        let mut tables = self.lock().map_err(MenuPersistenceError::query)?;
        if let Some(missing) = publication
            .meal_ids
            .iter()
            .find(|id| tables.active_meal(**id).is_none())
        {
            return Err(MenuPersistenceError::meal_not_found(*missing));
        }

        let mut seen = HashSet::with_capacity(publication.meal_ids.len());
        for meal_id in &publication.meal_ids {
            let published = tables
                .menu
                .iter()
                .any(|row| row.day == publication.day && row.meal_id == *meal_id);
            if published || !seen.insert(*meal_id) {
                return Err(MenuPersistenceError::duplicate_menu_entry(*meal_id));
            }
        }

        tables
            .menu
            .extend(publication.meal_ids.iter().map(|meal_id| MenuRow {
                day: publication.day,
                meal_id: *meal_id,
                added_by: publication.added_by,
                created_at: publication.created_at,
            }));
        Ok(tables.entries(publication.day, Some(&publication.meal_ids)))
    }

    async fn entries_for_day(
        &self,
        day: NaiveDate,
    ) -> Result<Vec<MenuEntry>, MenuPersistenceError> {
        let tables = self.lock().map_err(MenuPersistenceError::query)?;
        Ok(tables.entries(day, None))
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn place(&self, order: &Order) -> Result<(), OrderPersistenceError> {
        let mut tables = self.lock().map_err(OrderPersistenceError::query)?;
        let requested = order.items.iter().map(|item| item.meal_id);
        if let Some(missing) = tables.first_off_menu(order.day, requested) {
            return Err(OrderPersistenceError::meal_not_on_menu(missing));
        }
        tables.orders.push(order.clone());
        Ok(())
    }

    async fn find(&self, id: &OrderId) -> Result<Option<Order>, OrderPersistenceError> {
        let tables = self.lock().map_err(OrderPersistenceError::query)?;
        Ok(tables.orders.iter().find(|order| order.id == *id).cloned())
    }

    async fn list(&self, owner: Option<UserId>) -> Result<Vec<Order>, OrderPersistenceError> {
        let tables = self.lock().map_err(OrderPersistenceError::query)?;
        let mut orders: Vec<Order> = tables
            .orders
            .iter()
            .filter(|order| owner.is_none_or(|owner| order.owner == owner))
            .cloned()
            .collect();
        orders.sort_by(|a, b| {
            b.ordered_at
                .cmp(&a.ordered_at)
                .then(b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        Ok(orders)
    }

    async fn update(
        &self,
        id: &OrderId,
        patch: &OrderPatch,
    ) -> Result<Order, OrderPersistenceError> {
        let mut tables = self.lock().map_err(OrderPersistenceError::query)?;
        let index = tables
            .orders
            .iter()
            .position(|order| order.id == *id)
            .ok_or_else(|| OrderPersistenceError::order_not_found(*id))?;
        let current = &tables.orders[index];
        let updated = patch
            .apply_to(current)
            .map_err(OrderPersistenceError::rejected)?;
        if let Some(missing) = tables.first_off_menu(current.day, patch.replacement_meals()) {
            return Err(OrderPersistenceError::meal_not_on_menu(missing));
        }
        tables.orders[index] = updated.clone();
        Ok(updated)
    }
}

#[cfg(test)]
mod tests;
