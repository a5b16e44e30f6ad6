//! PostgreSQL adapters for the repository ports, built on Diesel.
//!
//! Queries run through `diesel-async` on a `bb8` pool. Row structs and the
//! table definitions stay private to this module; adapters translate them to
//! domain types and map every failure onto the port's error enum.
//!
//! ```ignore
//! use meal_backend::outbound::persistence::{DbPool, DieselMealRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/meals")).await?;
//! let meals = DieselMealRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_meal_repository;
mod diesel_menu_repository;
mod diesel_order_repository;
mod diesel_user_repository;
mod menu_day_queries;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_meal_repository::DieselMealRepository;
pub use diesel_menu_repository::DieselMenuRepository;
pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
