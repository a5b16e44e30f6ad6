//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every endpoint from the inbound layer, the bearer
//! security scheme, and the error envelope schemas. The document is served
//! by Swagger UI in debug builds and exported by `openapi-dump`.

use crate::domain::ports::{
    AuthSession, LineItemChange, LineItemRequest, MealChanges, NewMeal, PlaceOrderRequest,
    UpdateOrderRequest,
};
use crate::domain::{Clearance, LineItem, Meal, MenuEntry, Order, User};
use crate::inbound::http::auth::{LoginRequest, SignupRequest};
use crate::inbound::http::menu::PublishMenuRequest;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Adds the bearer credential security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let scheme = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .description(Some(
                "Token issued by POST /api/v1/auth/signup or /api/v1/auth/login.",
            ))
            .build();
        components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(scheme));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Meal ordering API",
        description = "Accounts, meal catalog, daily menu, and orders for a single caterer."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::delete_user,
        crate::inbound::http::meals::list_meals,
        crate::inbound::http::meals::create_meal,
        crate::inbound::http::meals::get_meal,
        crate::inbound::http::meals::update_meal,
        crate::inbound::http::meals::delete_meal,
        crate::inbound::http::menu::get_menu,
        crate::inbound::http::menu::publish_menu,
        crate::inbound::http::orders::list_orders,
        crate::inbound::http::orders::place_order,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::orders::update_order,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        AuthSession,
        User,
        Clearance,
        SignupRequest,
        LoginRequest,
        Meal,
        NewMeal,
        MealChanges,
        MenuEntry,
        PublishMenuRequest,
        Order,
        LineItem,
        PlaceOrderRequest,
        LineItemRequest,
        UpdateOrderRequest,
        LineItemChange,
    )),
    tags(
        (name = "auth", description = "Signup, login, and account removal"),
        (name = "meals", description = "Caterer-managed meal catalog"),
        (name = "menu", description = "Meals offered per day"),
        (name = "orders", description = "Orders against a day's menu"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
