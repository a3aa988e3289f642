//! API Routes
//!
//! Configures the Axum router: the fixed set of named endpoints, the
//! mode-dependent fallback, and the middleware stack.

use axum::{
    middleware,
    routing::{get, MethodRouter},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, trace::TraceLayer};

use super::handlers::{
    cache_clear_handler, cache_stats_handler, get_preferences_handler, handle_panic,
    health_handler, info_handler, method_not_allowed, proxy_handler, rewrite_proxy_handler,
    set_preferences_handler, status_handler, AppState,
};
use super::middleware::cors;
use crate::config::ServerMode;

// == Endpoint ==
/// Named endpoints, matched by exact path before any fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Health,
    Status,
    CacheClear,
    CacheStats,
    Proxy,
    Preferences,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Health,
        Endpoint::Status,
        Endpoint::CacheClear,
        Endpoint::CacheStats,
        Endpoint::Proxy,
        Endpoint::Preferences,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Health => "/health",
            Endpoint::Status => "/status",
            Endpoint::CacheClear => "/cache/clear",
            Endpoint::CacheStats => "/cache/stats",
            Endpoint::Proxy => "/proxy",
            Endpoint::Preferences => "/preferences",
        }
    }

    /// Handlers per supported method; any other method gets a JSON 405.
    fn method_router(self) -> MethodRouter<AppState> {
        let router = match self {
            Endpoint::Health => get(health_handler),
            Endpoint::Status => get(status_handler),
            Endpoint::CacheClear => get(cache_clear_handler).post(cache_clear_handler),
            Endpoint::CacheStats => get(cache_stats_handler),
            Endpoint::Proxy => get(proxy_handler),
            Endpoint::Preferences => get(get_preferences_handler).post(set_preferences_handler),
        };
        router.fallback(method_not_allowed)
    }
}

/// Creates the main router with all endpoints configured.
///
/// # Routing
/// 1. `OPTIONS` on any path: empty 200 from the CORS middleware
/// 2. Named endpoints (see [`Endpoint`])
/// 3. `/assets/*` when an assets directory is configured
/// 4. Anything else: the rewriting proxy, or the endpoint listing in service mode
///
/// # Middleware
/// - Tracing: logs all requests
/// - CORS: permissive headers on every response
/// - Panic catcher: a panicking handler becomes a generic JSON 500
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new();
    for endpoint in Endpoint::ALL {
        router = router.route(endpoint.path(), endpoint.method_router());
    }

    if let Some(dir) = &state.assets_dir {
        router = router.nest_service("/assets", ServeDir::new(dir));
    }

    let router = match state.mode {
        ServerMode::Proxy => router.fallback(rewrite_proxy_handler),
        ServerMode::Service => router.fallback(info_handler),
    };

    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::proxy::{Injection, UpstreamClient};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app(mode: ServerMode) -> Router {
        let state = AppState::new(
            CacheStore::new(100, 60_000),
            UpstreamClient::new("http://127.0.0.1:9").unwrap(),
            Injection::new("/assets/inject.css", "/assets/inject.js"),
            mode,
        );
        create_router(state)
    }

    #[test]
    fn test_endpoint_paths_are_unique() {
        let mut paths: Vec<_> = Endpoint::ALL.iter().map(|e| e.path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), Endpoint::ALL.len());
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = create_test_app(ServerMode::Service)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_named_endpoint_wins_in_proxy_mode() {
        let response = create_test_app(ServerMode::Proxy)
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unsupported_method_is_405() {
        let response = create_test_app(ServerMode::Service)
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/preferences")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_unknown_path_lists_endpoints_in_service_mode() {
        let response = create_test_app(ServerMode::Service)
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
