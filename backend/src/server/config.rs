//! Server settings loaded via OrthoConfig, and the configuration object the
//! server is built from.

use std::net::SocketAddr;
use std::time::Duration;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use meal_backend::domain::OrderVisibility;
use meal_backend::outbound::persistence::{DbPool, PoolConfig};
use meal_backend::outbound::security::JwtTokenIssuer;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Invalid setting values, reported before anything binds or connects.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("bind_addr {value:?} is not a socket address: {message}")]
    BindAddr { value: String, message: String },
    #[error("token_ttl_secs must be positive, got {0}")]
    TokenTtl(i64),
    #[error("token_secret must be set in release builds")]
    MissingTokenSecret,
    #[error(transparent)]
    Visibility(#[from] meal_backend::domain::UnknownOrderVisibility),
}

impl From<SettingsError> for std::io::Error {
    fn from(value: SettingsError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, value)
    }
}

/// Settings read from `MEALS_*` environment variables, CLI flags, or a
/// config file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MEALS")]
pub struct ServerSettings {
    /// Listen address, `0.0.0.0:8080` when unset.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the in-memory store is used.
    pub database_url: Option<String>,
    pub db_max_connections: Option<u32>,
    pub db_connect_timeout_secs: Option<u64>,
    /// HS256 secret for bearer credentials.
    pub token_secret: Option<String>,
    /// Bearer credential lifetime in seconds.
    #[ortho_config(default = 3600)]
    pub token_ttl_secs: i64,
    /// `own` or `none`.
    pub customer_order_visibility: Option<String>,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Pool settings when a database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }
        Some(
            PoolConfig::new(url)
                .with_max_size(self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS))
                .with_connection_timeout(Duration::from_secs(
                    self.db_connect_timeout_secs
                        .unwrap_or(DEFAULT_DB_CONNECT_TIMEOUT_SECS),
                )),
        )
    }

    pub fn token_ttl(&self) -> Result<TimeDelta, SettingsError> {
        let secs = self.token_ttl_secs;
        if secs <= 0 {
            return Err(SettingsError::TokenTtl(secs));
        }
        Ok(TimeDelta::seconds(secs))
    }

    pub fn order_visibility(&self) -> Result<OrderVisibility, SettingsError> {
        match self.customer_order_visibility.as_deref() {
            Some(raw) => Ok(raw.parse()?),
            None => Ok(OrderVisibility::default()),
        }
    }

    /// Token issuer for the configured secret.
    ///
    /// `allow_ephemeral` permits a random per-process secret when none is
    /// configured; outstanding credentials then die with the process.
    pub fn token_issuer(&self, allow_ephemeral: bool) -> Result<JwtTokenIssuer, SettingsError> {
        let ttl = self.token_ttl()?;
        match self.token_secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => Ok(JwtTokenIssuer::new(secret.as_bytes(), ttl)),
            None if allow_ephemeral => {
                tracing::warn!("token_secret unset; using an ephemeral secret (dev only)");
                Ok(JwtTokenIssuer::ephemeral(ttl))
            }
            None => Err(SettingsError::MissingTokenSecret),
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: JwtTokenIssuer,
    pub(crate) visibility: OrderVisibility,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: JwtTokenIssuer, visibility: OrderVisibility) -> Self {
        Self {
            bind_addr,
            tokens,
            visibility,
            db_pool: None,
        }
    }

    /// Use Diesel adapters backed by `pool` instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
