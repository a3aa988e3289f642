//! inject-proxy - a caching reverse proxy for a single upstream origin
//!
//! Forwards requests to the origin, injects a stylesheet and a script into HTML
//! responses, and exposes a small JSON API backed by a bounded TTL cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;
pub mod server;

pub use api::AppState;
pub use config::{Config, ServerMode};
pub use error::ProxyError;
