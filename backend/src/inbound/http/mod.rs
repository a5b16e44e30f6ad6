//! HTTP inbound adapter exposing the REST endpoints.
//!
//! Handlers parse transport input, resolve the bearer credential, and call a
//! driving port. Everything else happens in the domain.

pub mod auth;
pub mod bearer;
pub mod error;
pub mod health;
pub mod meals;
pub mod menu;
pub mod orders;
pub mod routes;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
