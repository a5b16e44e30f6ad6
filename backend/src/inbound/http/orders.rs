//! Order handlers.
//!
//! ```text
//! GET  /api/v1/orders
//! POST /api/v1/orders      {"items":[{"mealId":"...","quantity":2}]}
//! GET  /api/v1/orders/{id}
//! PUT  /api/v1/orders/{id} {"items":[{"position":0,"quantity":3}],"delivered":true}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use uuid::Uuid;

use crate::domain::ports::{PlaceOrderRequest, UpdateOrderRequest};
use crate::domain::{ApiResult, Order, OrderId};
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Orders visible to the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    responses(
        (status = 200, description = "Orders", body = [Order]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("/orders")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<Vec<Order>>> {
    let orders = state.orders.list_orders(auth.actor()).await?;
    Ok(web::Json(orders))
}

/// Place an order against a day's menu.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Meal not on the menu", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "placeOrder"
)]
#[post("/orders")]
pub async fn place_order(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<PlaceOrderRequest>,
) -> ApiResult<HttpResponse> {
    let order = state
        .orders
        .place_order(auth.actor(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(order))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order", body = Order),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/orders/{id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Order>> {
    let id = OrderId::from_uuid(path.into_inner());
    let order = state.orders.get_order(auth.actor(), id).await?;
    Ok(web::Json(order))
}

/// Edit line items or mark the order delivered. The patch applies as a whole.
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order identifier")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Updated order", body = Order),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "updateOrder"
)]
#[put("/orders/{id}")]
pub async fn update_order(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateOrderRequest>,
) -> ApiResult<web::Json<Order>> {
    let id = OrderId::from_uuid(path.into_inner());
    let order = state
        .orders
        .update_order(auth.actor(), id, payload.into_inner())
        .await?;
    Ok(web::Json(order))
}
