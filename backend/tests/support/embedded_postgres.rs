//! Template-backed test databases for the embedded cluster.
//!
//! Migrations run once into a template named after the migrations hash; every
//! test then clones that template, so suites never share rows and the schema
//! cannot drift from `backend/migrations`.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use meal_backend::domain::ports::MealPersistenceError;
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use uuid::Uuid;

use super::format_postgres_error;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_PREFIX: &str = "meals_template";
const PROVISION_ATTEMPTS: usize = 5;
const PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

fn template_name() -> Result<String, MealPersistenceError> {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(dir)
        .map_err(|err| MealPersistenceError::query(format!("hash migrations: {err}")))?;
    let short = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_PREFIX}_{short}"))
}

fn ensure_template(cluster: &ClusterHandle) -> Result<String, MealPersistenceError> {
    let name = template_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(name.as_str())
        .map_err(|err| MealPersistenceError::query(format!("template check: {err:?}")))?;
    if !exists {
        cluster
            .create_database(name.as_str())
            .map_err(|err| MealPersistenceError::query(format!("create template: {err:?}")))?;
        migrate_schema(&cluster.connection().database_url(&name))?;
    }
    Ok(name)
}

fn provision_once(
    cluster: &ClusterHandle,
    attempt: usize,
) -> Result<TemporaryDatabase, MealPersistenceError> {
    let template = ensure_template(cluster).map_err(|err| {
        MealPersistenceError::query(format!("attempt {attempt}/{PROVISION_ATTEMPTS}: {err}"))
    })?;
    let name = format!("test_{}", Uuid::new_v4());
    cluster
        .temporary_database_from_template(name.as_str(), template.as_str())
        .map_err(|err| {
            MealPersistenceError::query(format!(
                "clone template: attempt {attempt}/{PROVISION_ATTEMPTS}: {err:?}"
            ))
        })
}

/// Clone a fresh database from the migrated template.
pub fn provision_template_database(
    cluster: &ClusterHandle,
) -> Result<TemporaryDatabase, MealPersistenceError> {
    let mut last_error = None;
    for attempt in 1..=PROVISION_ATTEMPTS {
        match provision_once(cluster, attempt) {
            Ok(database) => return Ok(database),
            Err(err) => last_error = Some(err),
        }
        if attempt < PROVISION_ATTEMPTS {
            std::thread::sleep(PROVISION_RETRY_DELAY);
        }
    }
    Err(last_error
        .unwrap_or_else(|| MealPersistenceError::query("clone template: exhausted retries")))
}

/// Apply every embedded migration over a blocking connection.
pub fn migrate_schema(url: &str) -> Result<(), MealPersistenceError> {
    let mut conn = PgConnection::establish(url)
        .map_err(|err| MealPersistenceError::connection(format!("{err:?}")))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| MealPersistenceError::query(format!("migration: {err:?}")))?;
    Ok(())
}

/// Count the rows in `table`, bypassing the repositories' read filters.
pub fn count_rows(url: &str, table: &str) -> Result<i64, MealPersistenceError> {
    let mut client = Client::connect(url, NoTls)
        .map_err(|err| MealPersistenceError::connection(format_postgres_error(&err)))?;
    let row = client
        .query_one(format!("SELECT count(*) FROM {table}").as_str(), &[])
        .map_err(|err| MealPersistenceError::query(format_postgres_error(&err)))?;
    Ok(row.get(0))
}
