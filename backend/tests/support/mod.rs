//! Shared helpers for the Diesel integration suites.
//!
//! Each file under `tests/` compiles as its own crate, so the embedded cluster
//! bootstrap, template provisioning, and skip policy live here and are pulled
//! in with `mod support;`.

pub mod cluster_skip;
pub mod embedded_postgres;
pub mod pg_embed;

use meal_backend::outbound::persistence::{DbPool, PoolConfig};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use tokio::runtime::Runtime;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{count_rows, provision_template_database};

/// A migrated database cloned for one test, with a pool over it.
///
/// The runtime drives the async repositories from synchronous tests; the
/// database is dropped with the harness.
pub struct PgHarness {
    pub runtime: Runtime,
    pub pool: DbPool,
    pub url: String,
    _database: TemporaryDatabase,
}

impl PgHarness {
    pub fn start() -> Result<Self, String> {
        let runtime = Runtime::new().map_err(|err| err.to_string())?;
        let cluster = pg_embed::shared_cluster()?;
        let database = provision_template_database(cluster).map_err(|err| err.to_string())?;
        let url = database.url().to_string();
        let pool = runtime
            .block_on(DbPool::new(PoolConfig::new(url.as_str()).with_max_size(2)))
            .map_err(|err| err.to_string())?;
        Ok(Self {
            runtime,
            pool,
            url,
            _database: database,
        })
    }

    pub fn count(&self, table: &str) -> i64 {
        count_rows(&self.url, table).expect("row count query succeeds")
    }
}

/// Render a `postgres` error with its SQLSTATE and detail; the plain
/// `Display` collapses most database errors to "db error".
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };
    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    if let Some(hint) = db_error.hint() {
        summary.push_str("; hint: ");
        summary.push_str(hint);
    }
    summary
}
