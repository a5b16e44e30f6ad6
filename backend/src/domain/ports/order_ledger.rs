//! Driving port for placing and managing orders.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{Actor, Error, MealId, Order, OrderId};

/// One requested `(meal, quantity)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    #[schema(value_type = String, format = Uuid)]
    pub meal_id: MealId,
    #[schema(minimum = 1, example = 2)]
    pub quantity: i64,
}

/// Unvalidated order placement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    /// Menu day to order from; today when omitted.
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub day: Option<NaiveDate>,
    pub items: Vec<LineItemRequest>,
}

/// Edit of the line item at zero-based `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItemChange {
    pub position: usize,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub meal_id: Option<MealId>,
    #[serde(default)]
    pub quantity: Option<i64>,
}

/// Unvalidated order patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub items: Vec<LineItemChange>,
    /// `true` marks the order delivered (caterers only, one-way).
    #[serde(default)]
    pub delivered: Option<bool>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderLedger: Send + Sync {
    async fn place_order(&self, actor: &Actor, request: PlaceOrderRequest)
    -> Result<Order, Error>;

    /// Owner or caterer only.
    async fn get_order(&self, actor: &Actor, id: OrderId) -> Result<Order, Error>;

    /// Owner or caterer only; the patch applies atomically.
    async fn update_order(
        &self,
        actor: &Actor,
        id: OrderId,
        request: UpdateOrderRequest,
    ) -> Result<Order, Error>;

    /// Newest first; scope depends on clearance and deployment policy.
    async fn list_orders(&self, actor: &Actor) -> Result<Vec<Order>, Error>;
}
