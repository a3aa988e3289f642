//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

// == Server Mode ==
/// What the server does with requests that match no named endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerMode {
    /// Forward to the upstream origin and rewrite HTML responses
    #[default]
    Proxy,
    /// Answer with the endpoint listing
    Service,
}

impl FromStr for ServerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proxy" => Ok(ServerMode::Proxy),
            "service" => Ok(ServerMode::Service),
            other => Err(format!("unknown server mode '{}'", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// They are read once at startup and fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Cache time-to-live in milliseconds
    pub cache_ttl_ms: u64,
    /// Maximum number of entries the cache can hold
    pub max_cache_size: usize,
    /// Base URL of the upstream origin
    pub upstream_origin: String,
    pub mode: ServerMode,
    /// href of the stylesheet appended to every proxied HTML head
    pub stylesheet_href: String,
    /// src of the script appended to every proxied HTML body
    pub script_src: String,
    /// Directory served under `/assets`, if any
    pub assets_dir: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `CACHE_TTL_MS` - Cache TTL in milliseconds (default: 3600000)
    /// - `MAX_CACHE_SIZE` - Maximum cache entries (default: 100)
    /// - `UPSTREAM_ORIGIN` - Upstream base URL (default: http://127.0.0.1:8080)
    /// - `PROXY_MODE` - `proxy` or `service` (default: proxy)
    /// - `INJECT_STYLESHEET` - Injected stylesheet href (default: /assets/inject.css)
    /// - `INJECT_SCRIPT` - Injected script src (default: /assets/inject.js)
    /// - `ASSETS_DIR` - Directory served at /assets (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parsed_var("PORT").unwrap_or(defaults.server_port),
            cache_ttl_ms: parsed_var("CACHE_TTL_MS").unwrap_or(defaults.cache_ttl_ms),
            max_cache_size: parsed_var("MAX_CACHE_SIZE").unwrap_or(defaults.max_cache_size),
            upstream_origin: env::var("UPSTREAM_ORIGIN").unwrap_or(defaults.upstream_origin),
            mode: parsed_var("PROXY_MODE").unwrap_or(defaults.mode),
            stylesheet_href: env::var("INJECT_STYLESHEET").unwrap_or(defaults.stylesheet_href),
            script_src: env::var("INJECT_SCRIPT").unwrap_or(defaults.script_src),
            assets_dir: env::var("ASSETS_DIR")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }
}

fn parsed_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_ttl_ms: 3_600_000,
            max_cache_size: 100,
            upstream_origin: "http://127.0.0.1:8080".to_string(),
            mode: ServerMode::Proxy,
            stylesheet_href: "/assets/inject.css".to_string(),
            script_src: "/assets/inject.js".to_string(),
            assets_dir: None,
        }
    }
}
