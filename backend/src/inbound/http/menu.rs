//! Daily menu handlers.
//!
//! ```text
//! GET  /api/v1/menu?day=2024-01-01
//! POST /api/v1/menu {"day":"2024-01-01","mealIds":["..."]}
//! ```
//!
//! Both default to the server's current UTC date when `day` is omitted.

use actix_web::{HttpResponse, get, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{ApiResult, MealId, MenuEntry};
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Query string for `GET /api/v1/menu`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MenuQuery {
    /// Calendar day in `YYYY-MM-DD` form.
    #[param(value_type = Option<String>, format = Date, example = "2024-01-01")]
    pub day: Option<NaiveDate>,
}

/// Request body for `POST /api/v1/menu`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishMenuRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date, example = "2024-01-01")]
    pub day: Option<NaiveDate>,
    #[schema(value_type = Vec<String>)]
    pub meal_ids: Vec<MealId>,
}

/// Menu for one day. Retired meals are not listed.
#[utoipa::path(
    get,
    path = "/api/v1/menu",
    params(MenuQuery),
    responses(
        (status = 200, description = "Menu entries", body = [MenuEntry]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["menu"],
    operation_id = "getMenu"
)]
#[get("/menu")]
pub async fn get_menu(
    state: web::Data<HttpState>,
    auth: Authenticated,
    query: web::Query<MenuQuery>,
) -> ApiResult<web::Json<Vec<MenuEntry>>> {
    let entries = state.menu.today(auth.actor(), query.day).await?;
    Ok(web::Json(entries))
}

/// Add meals to a day's menu. Either every meal is added or none is.
#[utoipa::path(
    post,
    path = "/api/v1/menu",
    request_body = PublishMenuRequest,
    responses(
        (status = 201, description = "Entries added", body = [MenuEntry]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown meal", body = ErrorSchema),
        (status = 409, description = "Meal already on the menu", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["menu"],
    operation_id = "publishMenu"
)]
#[post("/menu")]
pub async fn publish_menu(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<PublishMenuRequest>,
) -> ApiResult<HttpResponse> {
    let PublishMenuRequest { day, meal_ids } = payload.into_inner();
    let entries = state.menu.publish(auth.actor(), day, meal_ids).await?;
    Ok(HttpResponse::Created().json(entries))
}
