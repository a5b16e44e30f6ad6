//! Order ledger model.
//!
//! An order is created in the `placed` state and may later be marked
//! delivered. Delivery is terminal: once set it cannot be cleared and the
//! line items freeze.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::meal::MealId;
use super::user::UserId;

/// Validation errors for order requests and patches.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderValidationError {
    #[error("an order needs at least one line item")]
    NoLineItems,
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),
    #[error("meal {meal_id} appears more than once in the order")]
    DuplicateMeal { meal_id: MealId },
    #[error("the patch does not change anything")]
    EmptyPatch,
    #[error("line item edit at position {position} changes nothing")]
    EmptyEdit { position: usize },
    #[error("position {position} is edited more than once")]
    DuplicatePosition { position: usize },
}

/// Stable order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Positive line item quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: i64) -> Result<Self, OrderValidationError> {
        u32::try_from(value)
            .ok()
            .filter(|qty| *qty >= 1)
            .map(Self)
            .ok_or(OrderValidationError::InvalidQuantity(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<Quantity> for u32 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

/// One `(meal, quantity)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[schema(value_type = String, format = Uuid)]
    pub meal_id: MealId,
    #[schema(value_type = u32, minimum = 1)]
    pub quantity: Quantity,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[schema(value_type = String, format = Uuid)]
    pub id: OrderId,
    #[schema(value_type = String, format = Uuid)]
    pub owner: UserId,
    /// Menu day the line items were validated against.
    #[schema(value_type = String, format = Date)]
    pub day: NaiveDate,
    pub ordered_at: DateTime<Utc>,
    pub delivered: bool,
    pub items: Vec<LineItem>,
}

/// Validated line items for a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    items: Vec<LineItem>,
}

impl OrderRequest {
    /// Validate raw `(meal, quantity)` pairs, preserving their order.
    pub fn try_new(
        raw: impl IntoIterator<Item = (MealId, i64)>,
    ) -> Result<Self, OrderValidationError> {
        let items = raw
            .into_iter()
            .map(|(meal_id, quantity)| {
                Ok(LineItem {
                    meal_id,
                    quantity: Quantity::new(quantity)?,
                })
            })
            .collect::<Result<Vec<_>, OrderValidationError>>()?;
        if items.is_empty() {
            return Err(OrderValidationError::NoLineItems);
        }
        ensure_distinct_meals(&items)?;
        Ok(Self { items })
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn into_order(
        self,
        id: OrderId,
        owner: UserId,
        day: NaiveDate,
        ordered_at: DateTime<Utc>,
    ) -> Order {
        Order {
            id,
            owner,
            day,
            ordered_at,
            delivered: false,
            items: self.items,
        }
    }
}

fn ensure_distinct_meals(items: &[LineItem]) -> Result<(), OrderValidationError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.meal_id) {
            return Err(OrderValidationError::DuplicateMeal {
                meal_id: item.meal_id,
            });
        }
    }
    Ok(())
}

/// Replacement for one existing line item, addressed by zero-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItemEdit {
    pub position: usize,
    pub meal_id: Option<MealId>,
    pub quantity: Option<Quantity>,
}

/// Reasons a structurally valid patch cannot be applied to a given order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchRejection {
    #[error("order has no line item at position {position}")]
    UnknownPosition { position: usize },
    #[error("delivered orders cannot be edited")]
    AlreadyDelivered,
    #[error("a delivered order cannot be marked undelivered")]
    DeliveryIsFinal,
    #[error(transparent)]
    Invalid(#[from] OrderValidationError),
}

/// Atomic set of changes to an order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderPatch {
    edits: Vec<LineItemEdit>,
    delivered: Option<bool>,
}

impl OrderPatch {
    pub fn try_new(
        edits: Vec<LineItemEdit>,
        delivered: Option<bool>,
    ) -> Result<Self, OrderValidationError> {
        if edits.is_empty() && delivered.is_none() {
            return Err(OrderValidationError::EmptyPatch);
        }
        let mut positions = HashSet::with_capacity(edits.len());
        for edit in &edits {
            if edit.meal_id.is_none() && edit.quantity.is_none() {
                return Err(OrderValidationError::EmptyEdit {
                    position: edit.position,
                });
            }
            if !positions.insert(edit.position) {
                return Err(OrderValidationError::DuplicatePosition {
                    position: edit.position,
                });
            }
        }
        Ok(Self { edits, delivered })
    }

    pub fn edits(&self) -> &[LineItemEdit] {
        &self.edits
    }

    pub fn delivered(&self) -> Option<bool> {
        self.delivered
    }

    /// Whether applying the patch marks the order delivered.
    pub fn marks_delivered(&self) -> bool {
        self.delivered == Some(true)
    }

    /// Meals introduced by the edits; these must be on the order's menu day.
    pub fn replacement_meals(&self) -> impl Iterator<Item = MealId> + '_ {
        self.edits.iter().filter_map(|edit| edit.meal_id)
    }

    /// Apply the patch to `order`, returning the updated order.
    ///
    /// Menu membership of replacement meals is not checked here.
    pub fn apply_to(&self, order: &Order) -> Result<Order, PatchRejection> {
        if order.delivered {
            if self.delivered == Some(false) {
                return Err(PatchRejection::DeliveryIsFinal);
            }
            if !self.edits.is_empty() {
                return Err(PatchRejection::AlreadyDelivered);
            }
        }

        let mut updated = order.clone();
        for edit in &self.edits {
            let item = updated
                .items
                .get_mut(edit.position)
                .ok_or(PatchRejection::UnknownPosition {
                    position: edit.position,
                })?;
            if let Some(meal_id) = edit.meal_id {
                item.meal_id = meal_id;
            }
            if let Some(quantity) = edit.quantity {
                item.quantity = quantity;
            }
        }
        ensure_distinct_meals(&updated.items)?;

        if self.marks_delivered() {
            updated.delivered = true;
        }
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "order_tests.rs"]
mod tests;
