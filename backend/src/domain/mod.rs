//! Domain primitives, aggregates, and services.
//!
//! Purpose: hold the meal-ordering rules independent of HTTP and storage.
//! Types validate on construction; services gate every operation on the
//! caller's clearance and map port failures onto [`Error`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Clearance, Actor, require_clearance: the permission hierarchy.
//! - User, Meal, MenuEntry, Order: entities.
//! - AccountService, CatalogService, MenuService, OrderService: driving
//!   port implementations.

pub mod auth;
pub mod clearance;
pub mod error;
pub mod meal;
pub mod menu;
pub mod order;
pub mod ports;
pub mod trace_id;
pub mod user;

mod account_service;
mod catalog_service;
mod menu_service;
mod order_service;

pub use self::account_service::AccountService;
pub use self::auth::{CredentialValidationError, LoginCredentials, Registration};
pub use self::catalog_service::CatalogService;
pub use self::clearance::{Actor, Clearance, UnknownClearance, require_clearance};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::meal::{Meal, MealDraft, MealId, MealPatch, MealValidationError, Price};
pub use self::menu::MenuEntry;
pub use self::menu_service::MenuService;
pub use self::order::{
    LineItem, LineItemEdit, Order, OrderId, OrderPatch, OrderRequest, OrderValidationError,
    PatchRejection, Quantity,
};
pub use self::order_service::{OrderService, OrderVisibility, UnknownOrderVisibility};
pub use self::trace_id::TraceId;
pub use self::user::{Email, StoredUser, User, UserId, UserValidationError, Username};

/// Convenient result alias for domain and adapter code.
pub type ApiResult<T> = Result<T, Error>;
