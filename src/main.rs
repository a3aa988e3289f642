//! inject-proxy - a caching reverse proxy that injects assets into upstream HTML
//!
//! Reads its configuration from the environment, serves until SIGINT or SIGTERM,
//! then drains in-flight requests and exits.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inject_proxy::{server, AppState, Config};

/// Main entry point for the proxy server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build application state (cache store, upstream client)
/// 4. Bind the listener on the configured port
/// 5. Serve until SIGINT/SIGTERM, then shut down gracefully
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inject_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting inject-proxy");

    let config = Config::from_env();
    info!(
        "Configuration loaded: mode={:?}, upstream={}, max_cache_size={}, cache_ttl={}ms, port={}",
        config.mode,
        config.upstream_origin,
        config.max_cache_size,
        config.cache_ttl_ms,
        config.server_port
    );

    let state = AppState::from_config(&config).context("failed to build application state")?;
    info!("Cache store initialized");

    let listener = server::bind(config.server_port)
        .await
        .with_context(|| format!("failed to bind port {}", config.server_port))?;

    server::serve(listener, state, server::shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
