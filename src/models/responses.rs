//! Response DTOs for the proxy server API
//!
//! Defines the structure of outgoing JSON bodies.

use serde::Serialize;
use serde_json::{json, Value};

/// Name reported by the health, status and info endpoints.
pub const SERVICE_NAME: &str = "inject-proxy";

/// Version reported by the status and info endpoints.
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Preferences returned when none have been stored (or they expired).
pub fn default_preferences() -> Value {
    json!({
        "theme": "dark",
        "autoplay": true,
        "quality": "auto"
    })
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (always "healthy")
    pub status: String,
    pub service: String,
    /// Seconds since the server started
    pub uptime: f64,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(uptime: f64) -> Self {
        Self {
            status: "healthy".to_string(),
            service: SERVICE_NAME.to_string(),
            uptime,
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        }
    }
}

/// Response body for the status endpoint (GET /status)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// Current number of cache entries
    pub cache_size: usize,
    /// Configured cache capacity
    pub cache_limit: usize,
}

impl StatusResponse {
    pub fn running(cache_size: usize, cache_limit: usize) -> Self {
        Self {
            status: "running".to_string(),
            service: SERVICE_NAME.to_string(),
            version: SERVICE_VERSION.to_string(),
            cache_size,
            cache_limit,
        }
    }
}

/// Response body for cache clearing (GET/POST /cache/clear)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheClearResponse {
    pub message: String,
    pub items_removed: usize,
}

impl CacheClearResponse {
    pub fn new(items_removed: usize) -> Self {
        Self {
            message: "Cache cleared".to_string(),
            items_removed,
        }
    }
}

/// Response body for the API-proxy endpoint (GET /proxy)
#[derive(Debug, Clone, Serialize)]
pub struct ProxyDataResponse {
    /// Upstream body as text
    pub data: Value,
    /// Whether the body came from the cache
    pub cached: bool,
}

/// Response body for a stored preferences document (POST /preferences)
#[derive(Debug, Clone, Serialize)]
pub struct PreferencesSavedResponse {
    pub message: String,
    pub preferences: Value,
}

impl PreferencesSavedResponse {
    pub fn new(preferences: Value) -> Self {
        Self {
            message: "Preferences saved".to_string(),
            preferences,
        }
    }
}

/// Endpoint listing (any unmatched path in service mode)
#[derive(Debug, Clone, Serialize)]
pub struct InfoResponse {
    pub message: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

impl InfoResponse {
    pub fn new(endpoints: Vec<String>) -> Self {
        Self {
            message: format!("{} service", SERVICE_NAME),
            version: SERVICE_VERSION.to_string(),
            endpoints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preferences() {
        let prefs = default_preferences();
        assert_eq!(prefs["theme"], "dark");
        assert_eq!(prefs["autoplay"], true);
        assert_eq!(prefs["quality"], "auto");
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_value(HealthResponse::healthy(1.5)).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], SERVICE_NAME);
        assert_eq!(json["uptime"], 1.5);
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_status_response_camel_case() {
        let json = serde_json::to_value(StatusResponse::running(3, 100)).unwrap();
        assert_eq!(json["status"], "running");
        assert_eq!(json["cacheSize"], 3);
        assert_eq!(json["cacheLimit"], 100);
    }

    #[test]
    fn test_cache_clear_response_serialize() {
        let json = serde_json::to_value(CacheClearResponse::new(7)).unwrap();
        assert_eq!(json["message"], "Cache cleared");
        assert_eq!(json["itemsRemoved"], 7);
    }

    #[test]
    fn test_info_response_lists_endpoints() {
        let json = serde_json::to_value(InfoResponse::new(vec!["/health".to_string()])).unwrap();
        assert_eq!(json["endpoints"][0], "/health");
        assert_eq!(json["version"], SERVICE_VERSION);
    }
}
