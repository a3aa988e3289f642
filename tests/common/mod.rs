//! Shared helpers for integration tests.

#![allow(dead_code)]

use axum::{body::Body, Router};
use inject_proxy::{
    api::create_router,
    cache::CacheStore,
    proxy::{Injection, UpstreamClient},
    AppState, ServerMode,
};
use serde_json::Value;

pub const STYLESHEET: &str = "/assets/inject.css";
pub const SCRIPT: &str = "/assets/inject.js";

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Returns a base URL on which nothing is listening.
pub async fn dead_origin() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn test_state(origin: &str, mode: ServerMode, max_entries: usize, ttl_ms: u64) -> AppState {
    AppState::new(
        CacheStore::new(max_entries, ttl_ms),
        UpstreamClient::new(origin).unwrap(),
        Injection::new(STYLESHEET, SCRIPT),
        mode,
    )
}

pub fn service_app() -> Router {
    create_router(test_state("http://127.0.0.1:9", ServerMode::Service, 100, 60_000))
}

pub fn proxy_app(origin: &str) -> Router {
    create_router(test_state(origin, ServerMode::Proxy, 100, 60_000))
}

pub async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec()
}

pub async fn body_to_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}
