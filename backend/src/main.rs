//! Backend entry-point: loads settings, prepares storage, and serves the API.

mod server;

use actix_web::web;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use meal_backend::inbound::http::health::HealthState;
use meal_backend::outbound::persistence::{DbPool, run_pending_migrations};
use ortho_config::OrthoConfig;
use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;

    let tokens = settings.token_issuer(cfg!(debug_assertions))?;
    let mut config = ServerConfig::new(
        settings.bind_addr()?,
        tokens,
        settings.order_visibility()?,
    );

    match settings.pool_config() {
        Some(pool_config) => {
            run_pending_migrations(pool_config.database_url())
                .await
                .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
            let pool = DbPool::new(pool_config)
                .await
                .map_err(|e| std::io::Error::other(format!("database pool failed: {e}")))?;
            config = config.with_db_pool(pool);
        }
        None => warn!("database_url unset; data is kept in memory and lost on exit"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_draining();
    result
}
