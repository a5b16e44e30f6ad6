//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`AccountCommand`, `IdentityResolver`, `MealCatalog`,
//! `DailyMenu`, `OrderLedger`) are what inbound adapters call. Driven ports
//! (`*Repository`, `PasswordHasher`, `TokenIssuer`) are what the services
//! call and outbound adapters implement.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod daily_menu;
mod meal_catalog;
mod meal_repository;
mod menu_repository;
mod order_ledger;
mod order_repository;
mod password_hasher;
mod token_issuer;
mod user_repository;

#[cfg(test)]
pub use account_command::{MockAccountCommand, MockIdentityResolver};
pub use account_command::{AccountCommand, AuthSession, IdentityResolver};
#[cfg(test)]
pub use daily_menu::MockDailyMenu;
pub use daily_menu::DailyMenu;
#[cfg(test)]
pub use meal_catalog::MockMealCatalog;
pub use meal_catalog::{MealCatalog, MealChanges, NewMeal};
#[cfg(test)]
pub use meal_repository::MockMealRepository;
pub use meal_repository::{MealPersistenceError, MealRepository};
#[cfg(test)]
pub use menu_repository::MockMenuRepository;
pub use menu_repository::{MenuPersistenceError, MenuPublication, MenuRepository};
#[cfg(test)]
pub use order_ledger::MockOrderLedger;
pub use order_ledger::{
    LineItemChange, LineItemRequest, OrderLedger, PlaceOrderRequest, UpdateOrderRequest,
};
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{OrderPersistenceError, OrderRepository};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use token_issuer::{IssuedToken, TokenError, TokenIssuer};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
