//! Order ledger service.
//!
//! Orders are validated against the daily menu of the day they were placed
//! for. The repository performs the menu check and the write as one atomic
//! step so a concurrent publish cannot slip between them.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    OrderLedger, OrderPersistenceError, OrderRepository, PlaceOrderRequest, UpdateOrderRequest,
};
use crate::domain::{
    Actor, Clearance, Error, LineItemEdit, Order, OrderId, OrderPatch, OrderRequest,
    OrderValidationError, PatchRejection, Quantity, require_clearance,
};

/// Which orders a customer-level caller may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderVisibility {
    /// Customers see their own orders.
    #[default]
    Own,
    /// Listing orders requires caterer clearance.
    None,
}

/// Raised when a configuration value names no visibility policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order visibility {0:?}; expected \"own\" or \"none\"")]
pub struct UnknownOrderVisibility(pub String);

impl FromStr for OrderVisibility {
    type Err = UnknownOrderVisibility;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "own" => Ok(Self::Own),
            "none" => Ok(Self::None),
            _ => Err(UnknownOrderVisibility(s.to_owned())),
        }
    }
}

impl fmt::Display for OrderVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Own => "own",
            Self::None => "none",
        })
    }
}

fn map_order_error(error: OrderPersistenceError) -> Error {
    match error {
        OrderPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("order repository unavailable: {message}"))
        }
        OrderPersistenceError::Query { message } => {
            Error::internal(format!("order repository error: {message}"))
        }
        OrderPersistenceError::MealNotOnMenu { meal_id } => {
            Error::not_found(format!("meal {meal_id} is not on the menu for that day"))
                .with_details(json!({ "mealId": meal_id }))
        }
        OrderPersistenceError::OrderNotFound { order_id } => order_not_found(order_id),
        OrderPersistenceError::Rejected { reason } => map_rejection(reason),
    }
}

fn map_rejection(reason: PatchRejection) -> Error {
    match reason {
        PatchRejection::UnknownPosition { position } => Error::not_found(reason.to_string())
            .with_details(json!({ "position": position })),
        PatchRejection::AlreadyDelivered
        | PatchRejection::DeliveryIsFinal
        | PatchRejection::Invalid(_) => Error::invalid_request(reason.to_string()),
    }
}

fn invalid_order(error: OrderValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

fn order_not_found(id: OrderId) -> Error {
    Error::not_found(format!("order {id} not found"))
}

fn ensure_may_access(actor: &Actor, order: &Order) -> Result<(), Error> {
    if actor.is(&order.owner) || actor.clearance.at_least(Clearance::Caterer) {
        Ok(())
    } else {
        Err(Error::unauthorized("only the owner or a caterer may access this order"))
    }
}

fn build_patch(request: UpdateOrderRequest) -> Result<OrderPatch, OrderValidationError> {
    let edits = request
        .items
        .into_iter()
        .map(|change| {
            Ok(LineItemEdit {
                position: change.position,
                meal_id: change.meal_id,
                quantity: change.quantity.map(Quantity::new).transpose()?,
            })
        })
        .collect::<Result<Vec<_>, OrderValidationError>>()?;
    OrderPatch::try_new(edits, request.delivered)
}

/// Order service implementing [`OrderLedger`].
#[derive(Clone)]
pub struct OrderService<O> {
    orders: Arc<O>,
    clock: Arc<dyn Clock>,
    visibility: OrderVisibility,
}

impl<O> OrderService<O> {
    pub fn new(orders: Arc<O>, clock: Arc<dyn Clock>, visibility: OrderVisibility) -> Self {
        Self {
            orders,
            clock,
            visibility,
        }
    }
}

impl<O> OrderService<O>
where
    O: OrderRepository,
{
    async fn load_accessible(&self, actor: &Actor, id: OrderId) -> Result<Order, Error> {
        let order = self
            .orders
            .find(&id)
            .await
            .map_err(map_order_error)?
            .ok_or_else(|| order_not_found(id))?;
        ensure_may_access(actor, &order)?;
        Ok(order)
    }
}

#[async_trait]
impl<O> OrderLedger for OrderService<O>
where
    O: OrderRepository,
{
    async fn place_order(
        &self,
        actor: &Actor,
        request: PlaceOrderRequest,
    ) -> Result<Order, Error> {
        require_clearance(actor, Clearance::Customer)?;
        let validated = OrderRequest::try_new(
            request
                .items
                .iter()
                .map(|item| (item.meal_id, item.quantity)),
        )
        .map_err(invalid_order)?;

        let now = self.clock.utc();
        let day = request.day.unwrap_or_else(|| now.date_naive());
        let order = validated.into_order(OrderId::random(), actor.id, day, now);
        self.orders.place(&order).await.map_err(map_order_error)?;

        info!(
            order_id = %order.id,
            owner = %actor.id,
            day = %order.day,
            line_items = order.items.len(),
            "order placed"
        );
        Ok(order)
    }

    async fn get_order(&self, actor: &Actor, id: OrderId) -> Result<Order, Error> {
        require_clearance(actor, Clearance::Customer)?;
        self.load_accessible(actor, id).await
    }

    async fn update_order(
        &self,
        actor: &Actor,
        id: OrderId,
        request: UpdateOrderRequest,
    ) -> Result<Order, Error> {
        require_clearance(actor, Clearance::Customer)?;
        let patch = build_patch(request).map_err(invalid_order)?;
        if patch.marks_delivered() {
            require_clearance(actor, Clearance::Caterer)?;
        }
        self.load_accessible(actor, id).await?;

        let updated = self
            .orders
            .update(&id, &patch)
            .await
            .map_err(map_order_error)?;
        info!(
            order_id = %id,
            editor = %actor.id,
            edits = patch.edits().len(),
            delivered = updated.delivered,
            "order updated"
        );
        Ok(updated)
    }

    async fn list_orders(&self, actor: &Actor) -> Result<Vec<Order>, Error> {
        require_clearance(actor, Clearance::Customer)?;
        let owner = if actor.clearance.at_least(Clearance::Caterer) {
            None
        } else {
            match self.visibility {
                OrderVisibility::Own => Some(actor.id),
                OrderVisibility::None => {
                    return Err(Error::unauthorized("listing orders requires caterer clearance"));
                }
            }
        };
        self.orders.list(owner).await.map_err(map_order_error)
    }
}

#[cfg(test)]
#[path = "order_service_tests.rs"]
mod tests;
