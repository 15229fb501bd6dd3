//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Maximum pooled database connections.
    pub database_max_connections: u32,
    /// Connection attempts at startup before giving up.
    pub database_connect_retries: u32,
    /// Redis URL. Cache invalidation is disabled when unset.
    pub redis_url: Option<String>,
    /// Directory for daily log files. Logs go to stdout only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `API_ADDR` | Server bind address | `0.0.0.0:8080` |
    /// | `DATABASE_URL` | SQLite database URL | `sqlite:orders.db?mode=rwc` |
    /// | `DATABASE_MAX_CONNECTIONS` | Pool size | `20` |
    /// | `DATABASE_CONNECT_RETRIES` | Startup connection attempts | `10` |
    /// | `REDIS_URL` | Redis URL for cache invalidation | (disabled) |
    /// | `LOG_FILE` | Directory for rolling log files | (stdout only) |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = lookup("API_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite:orders.db?mode=rwc".to_string());

        let database_max_connections = parse_number(&lookup, "DATABASE_MAX_CONNECTIONS", 20)?;
        let database_connect_retries = parse_number(&lookup, "DATABASE_CONNECT_RETRIES", 10)?;

        let redis_url = lookup("REDIS_URL").filter(|v| !v.trim().is_empty());
        let log_dir = lookup("LOG_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            addr,
            database_url,
            database_max_connections,
            database_connect_retries,
            redis_url,
            log_dir,
        })
    }
}

fn parse_number(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u32,
) -> Result<u32, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(ConfigError::InvalidNumber(var)),
        },
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API_ADDR format")]
    InvalidAddr,

    #[error("{0} must be a positive integer")]
    InvalidNumber(&'static str),
}
