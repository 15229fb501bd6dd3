//! REST API for users, order items and order histories.

mod config;
mod error;
mod response;
mod routes;
mod state;
mod validation;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use cache::{CacheInvalidator, DisabledCache, RedisCache};
use database::Database;
use orders::Services;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

/// Pause between startup database connection attempts.
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Load configuration
    let config = Config::from_env()?;
    let _log_guard = init_tracing(config.log_dir.as_deref());
    info!(addr = %config.addr, "Starting orders API");

    // Connect to database
    let db = Database::connect_with_retry(
        &config.database_url,
        config.database_max_connections,
        config.database_connect_retries,
        CONNECT_RETRY_DELAY,
    )
    .await?;
    db.migrate().await?;

    let cache = connect_cache(config.redis_url.as_deref());
    info!(cache = cache.name(), "Cache invalidation configured");

    // Build application state
    let services = Services::new(db.clone(), cache);
    let state = AppState::new(services);

    // Build router
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "Orders API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Orders API stopped");
    Ok(())
}

/// Install the global subscriber. Keep the returned guard alive so buffered
/// file output is flushed on exit.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "api.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

fn connect_cache(redis_url: Option<&str>) -> Arc<dyn CacheInvalidator> {
    let Some(url) = redis_url else {
        return Arc::new(DisabledCache);
    };

    match RedisCache::open(url) {
        Ok(cache) => Arc::new(cache),
        Err(err) => {
            warn!(error = %err, "Invalid REDIS_URL, cache invalidation disabled");
            Arc::new(DisabledCache)
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
