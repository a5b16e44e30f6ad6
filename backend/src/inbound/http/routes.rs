//! Route table for the versioned REST API.
//!
//! Everything below is mounted under [`API_PREFIX`]; health probes and the
//! docs UI live outside it.

use actix_web::web;

use crate::inbound::http::error::{json_error_handler, path_error_handler, query_error_handler};
use crate::inbound::http::{auth, meals, menu, orders};

/// Prefix shared by every versioned endpoint.
pub const API_PREFIX: &str = "/api/v1";

/// Extractor configs that turn malformed input into the JSON error envelope.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler));
}

/// Register the `/api/v1` scope.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use meal_backend::inbound::http::routes::configure_api;
///
/// let app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_PREFIX)
            .configure(configure_extractors)
            .service(auth::signup)
            .service(auth::login)
            .service(auth::delete_user)
            .service(meals::list_meals)
            .service(meals::create_meal)
            .service(meals::get_meal)
            .service(meals::update_meal)
            .service(meals::delete_meal)
            .service(menu::get_menu)
            .service(menu::publish_menu)
            .service(orders::list_orders)
            .service(orders::place_order)
            .service(orders::get_order)
            .service(orders::update_order),
    );
}
