//! Meal catalog handlers. Every route requires caterer clearance, which the
//! catalog service enforces.
//!
//! ```text
//! GET    /api/v1/meals
//! POST   /api/v1/meals       {"name":"Soup","price":5.0}
//! GET    /api/v1/meals/{id}
//! PUT    /api/v1/meals/{id}  {"price":6.5}
//! DELETE /api/v1/meals/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use uuid::Uuid;

use crate::domain::ports::{MealChanges, NewMeal};
use crate::domain::{ApiResult, Meal, MealId};
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// List active meals.
#[utoipa::path(
    get,
    path = "/api/v1/meals",
    responses(
        (status = 200, description = "Active meals", body = [Meal]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["meals"],
    operation_id = "listMeals"
)]
#[get("/meals")]
pub async fn list_meals(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<Vec<Meal>>> {
    let meals = state.catalog.list_meals(auth.actor()).await?;
    Ok(web::Json(meals))
}

/// Add a meal to the catalog.
#[utoipa::path(
    post,
    path = "/api/v1/meals",
    request_body = NewMeal,
    responses(
        (status = 201, description = "Meal created", body = Meal),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["meals"],
    operation_id = "createMeal"
)]
#[post("/meals")]
pub async fn create_meal(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<NewMeal>,
) -> ApiResult<HttpResponse> {
    let meal = state
        .catalog
        .create_meal(auth.actor(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(meal))
}

#[utoipa::path(
    get,
    path = "/api/v1/meals/{id}",
    params(("id" = Uuid, Path, description = "Meal identifier")),
    responses(
        (status = 200, description = "Meal", body = Meal),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["meals"],
    operation_id = "getMeal"
)]
#[get("/meals/{id}")]
pub async fn get_meal(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Meal>> {
    let id = MealId::from_uuid(path.into_inner());
    let meal = state.catalog.get_meal(auth.actor(), id).await?;
    Ok(web::Json(meal))
}

/// Partially update a meal; absent fields keep their value.
#[utoipa::path(
    put,
    path = "/api/v1/meals/{id}",
    params(("id" = Uuid, Path, description = "Meal identifier")),
    request_body = MealChanges,
    responses(
        (status = 200, description = "Updated meal", body = Meal),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["meals"],
    operation_id = "updateMeal"
)]
#[put("/meals/{id}")]
pub async fn update_meal(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<Uuid>,
    payload: web::Json<MealChanges>,
) -> ApiResult<web::Json<Meal>> {
    let id = MealId::from_uuid(path.into_inner());
    let meal = state
        .catalog
        .update_meal(auth.actor(), id, payload.into_inner())
        .await?;
    Ok(web::Json(meal))
}

/// Retire a meal. Orders that already reference it are unaffected.
#[utoipa::path(
    delete,
    path = "/api/v1/meals/{id}",
    params(("id" = Uuid, Path, description = "Meal identifier")),
    responses(
        (status = 204, description = "Meal retired"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["meals"],
    operation_id = "deleteMeal"
)]
#[delete("/meals/{id}")]
pub async fn delete_meal(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = MealId::from_uuid(path.into_inner());
    state.catalog.delete_meal(auth.actor(), id).await?;
    Ok(HttpResponse::NoContent().finish())
}
