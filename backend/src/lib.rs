//! Meal-ordering backend library.
//!
//! Hexagonal layout: [`domain`] holds the rules and ports, [`inbound`] the
//! HTTP adapter, and [`outbound`] the storage and security adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[doc(hidden)]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
