//! Port abstraction for the order ledger.
use async_trait::async_trait;

use crate::domain::{MealId, Order, OrderId, OrderPatch, PatchRejection, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by order repository adapters.
    pub enum OrderPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "order repository query failed: {message}",
        /// A line item names a meal absent from the order's menu day.
        MealNotOnMenu { meal_id: MealId } => "meal {meal_id} is not on the menu for that day",
        /// The order disappeared between lookup and update.
        OrderNotFound { order_id: OrderId } => "order {order_id} not found",
        /// The patch conflicts with the stored order.
        Rejected { reason: PatchRejection } => "{reason}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist `order` after checking every line item against the menu for
    /// `order.day`. Nothing is written when any check fails.
    async fn place(&self, order: &Order) -> Result<(), OrderPersistenceError>;

    async fn find(&self, id: &OrderId) -> Result<Option<Order>, OrderPersistenceError>;

    /// Orders newest first; restricted to `owner` when given.
    async fn list(&self, owner: Option<UserId>) -> Result<Vec<Order>, OrderPersistenceError>;

    /// Apply `patch` to the stored order and re-validate replacement meals
    /// against the order's own menu day, all in one atomic step.
    async fn update(
        &self,
        id: &OrderId,
        patch: &OrderPatch,
    ) -> Result<Order, OrderPersistenceError>;
}
