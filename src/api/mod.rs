//! API Module
//!
//! HTTP handlers and routing for the proxy server.
//!
//! # Endpoints
//! - `GET /health` - Health check
//! - `GET /status` - Service status and cache occupancy
//! - `GET|POST /cache/clear` - Drop every cache entry
//! - `GET /cache/stats` - Cache snapshot
//! - `GET /proxy?url=` - Fetch an absolute URL through the cache
//! - `GET|POST /preferences` - Read or store the preferences document
//! - anything else - rewriting proxy (proxy mode) or endpoint listing (service mode)

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use routes::{create_router, Endpoint};
