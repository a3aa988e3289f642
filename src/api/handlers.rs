//! API Handlers
//!
//! HTTP request handlers for the named endpoints and the rewriting proxy.

use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{
        header::{CONTENT_TYPE, USER_AGENT},
        HeaderMap, HeaderValue, Method, Uri,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::routes::Endpoint;
use crate::cache::{CacheSnapshot, CacheStore};
use crate::config::{Config, ServerMode};
use crate::error::{ProxyError, Result};
use crate::models::{
    default_preferences, CacheClearResponse, HealthResponse, InfoResponse,
    PreferencesSavedResponse, ProxyDataResponse, ProxyQuery, StatusResponse,
};
use crate::proxy::{transform, Injection, UpstreamClient, FALLBACK_USER_AGENT, SERVICE_USER_AGENT};

/// Cache key the preferences document is stored under.
pub const PREFERENCES_KEY: &str = "user_preferences";

/// Application state shared across all handlers.
///
/// The cache store is wrapped in Arc<RwLock<>>; every read may purge a stale
/// entry, so both reads and writes of entries take the write lock.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache store
    pub cache: Arc<RwLock<CacheStore>>,
    /// Client bound to the upstream origin
    pub upstream: UpstreamClient,
    /// Assets added to proxied HTML
    pub injection: Arc<Injection>,
    /// Fallback behavior for unmatched paths
    pub mode: ServerMode,
    /// Directory served under `/assets`
    pub assets_dir: Option<PathBuf>,
    pub started_at: Instant,
}

impl AppState {
    /// Creates a new AppState around the given cache and upstream client.
    pub fn new(
        cache: CacheStore,
        upstream: UpstreamClient,
        injection: Injection,
        mode: ServerMode,
    ) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            upstream,
            injection: Arc::new(injection),
            mode,
            assets_dir: None,
            started_at: Instant::now(),
        }
    }

    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = Some(dir.into());
        self
    }

    /// Creates a new AppState from configuration.
    ///
    /// Fails if the upstream origin is not an absolute http(s) URL.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = CacheStore::new(config.max_cache_size, config.cache_ttl_ms);
        let upstream = UpstreamClient::new(&config.upstream_origin)?;
        let injection = Injection::new(&config.stylesheet_href, &config.script_src);

        let state = Self::new(cache, upstream, injection, config.mode);
        Ok(match &config.assets_dir {
            Some(dir) => state.with_assets_dir(dir.clone()),
            None => state,
        })
    }

    /// Seconds since the state was created.
    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.uptime_secs()))
}

/// Handler for GET /status
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let cache = state.cache.read().await;
    Json(StatusResponse::running(cache.len(), cache.max_entries()))
}

/// Handler for GET/POST /cache/clear
pub async fn cache_clear_handler(State(state): State<AppState>) -> Json<CacheClearResponse> {
    let removed = state.cache.write().await.clear();
    info!("Cache cleared: {} entries removed", removed);

    Json(CacheClearResponse::new(removed))
}

/// Handler for GET /cache/stats
///
/// Reports stale entries too; expiry happens only on read.
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheSnapshot> {
    let cache = state.cache.read().await;
    Json(cache.stats())
}

/// Handler for GET /proxy?url=...
///
/// Serves the body from the cache when fresh, otherwise fetches it once and
/// caches it under the normalized target URL. No lock is held while the
/// upstream request is in flight.
pub async fn proxy_handler(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Json<ProxyDataResponse>> {
    let target = query.target()?;
    let key = target.to_string();

    let cached = state.cache.write().await.get(&key);
    if let Some(data) = cached {
        info!("Cache hit for: {}", key);
        return Ok(Json(ProxyDataResponse { data, cached: true }));
    }
    debug!("Cache miss for: {}", key);

    let upstream = state.upstream.fetch(&target, SERVICE_USER_AGENT).await?;
    let data = Value::String(String::from_utf8_lossy(&upstream.body).into_owned());

    state.cache.write().await.put(key, data.clone());

    Ok(Json(ProxyDataResponse {
        data,
        cached: false,
    }))
}

/// Handler for GET /preferences
pub async fn get_preferences_handler(State(state): State<AppState>) -> Json<Value> {
    let stored = state.cache.write().await.get(PREFERENCES_KEY);
    Json(stored.unwrap_or_else(default_preferences))
}

/// Handler for POST /preferences
///
/// Accepts any JSON document and stores it as-is.
pub async fn set_preferences_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PreferencesSavedResponse>> {
    let preferences: Value = serde_json::from_slice(&body)
        .map_err(|_| ProxyError::BadRequest("Invalid JSON".to_string()))?;

    state
        .cache
        .write()
        .await
        .put(PREFERENCES_KEY, preferences.clone());

    Ok(Json(PreferencesSavedResponse::new(preferences)))
}

/// Fallback for unmatched paths in service mode.
pub async fn info_handler() -> Json<InfoResponse> {
    let endpoints = Endpoint::ALL
        .iter()
        .map(|endpoint| endpoint.path().to_string())
        .collect();

    Json(InfoResponse::new(endpoints))
}

/// Fallback for unmatched paths in proxy mode.
///
/// Forwards the path and query to the upstream origin, relays the status, and
/// rewrites HTML bodies. Non-HTML bodies are relayed byte-for-byte.
pub async fn rewrite_proxy_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response> {
    if method != Method::GET && method != Method::HEAD {
        return Err(ProxyError::MethodNotAllowed);
    }

    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let target = state.upstream.origin_target(path_and_query)?;
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .filter(|ua| !ua.is_empty())
        .unwrap_or(FALLBACK_USER_AGENT);

    let upstream = state.upstream.fetch(&target, user_agent).await?;
    let status = upstream.status;
    let transformed = transform(upstream.body, upstream.content_type.as_deref(), &state.injection);
    if transformed.injected {
        debug!(%target, "injected assets into HTML");
    }

    let mut response = (status, transformed.body).into_response();
    match transformed
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
    {
        Some(value) => {
            response.headers_mut().insert(CONTENT_TYPE, value);
        }
        None => {
            response.headers_mut().remove(CONTENT_TYPE);
        }
    }

    Ok(response)
}

/// Answers a named endpoint called with a method it does not support.
pub async fn method_not_allowed() -> ProxyError {
    ProxyError::MethodNotAllowed
}

/// Turns a handler panic into the generic 500 body.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else {
        "handler panicked".to_string()
    };

    ProxyError::Internal(detail).into_response()
}
