//! Upstream Fetcher
//!
//! Performs single GET round trips to the fixed origin or to an arbitrary
//! absolute URL, returning the raw status, content type and body bytes.
//!
//! No request timeout is configured: a fetch runs until the upstream answers or
//! the network stack gives up.

use axum::body::Bytes;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::error::{ProxyError, Result};

/// User agent sent by the `/proxy` endpoint.
pub const SERVICE_USER_AGENT: &str = concat!("inject-proxy/", env!("CARGO_PKG_VERSION"));

/// User agent forwarded upstream when the client sent none.
pub const FALLBACK_USER_AGENT: &str = "inject-proxy";

// == Upstream Response ==
/// Outcome of one completed upstream round trip, whatever its status.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

// == Upstream Client ==
/// HTTP client bound to the fixed upstream origin.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    origin: Url,
}

impl UpstreamClient {
    /// Builds a client for `origin`, which must be an absolute http(s) URL.
    pub fn new(origin: &str) -> Result<Self> {
        let origin = Url::parse(origin)
            .map_err(|e| ProxyError::InvalidConfig(format!("upstream origin '{}': {}", origin, e)))?;
        if !is_http(&origin) {
            return Err(ProxyError::InvalidConfig(format!(
                "upstream origin '{}' must use http or https",
                origin
            )));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| ProxyError::InvalidConfig(format!("http client: {}", e)))?;

        Ok(Self { client, origin })
    }

    // == Origin Target ==
    /// Appends an inbound path and query to the origin.
    ///
    /// The origin's own path, if any, is kept as a prefix.
    pub fn origin_target(&self, path_and_query: &str) -> Result<Url> {
        let base = self.origin.as_str().trim_end_matches('/');
        let joined = if path_and_query.starts_with('/') {
            format!("{}{}", base, path_and_query)
        } else {
            format!("{}/{}", base, path_and_query)
        };

        Url::parse(&joined)
            .map_err(|e| ProxyError::BadRequest(format!("Invalid request path: {}", e)))
    }

    // == Fetch ==
    /// Performs one GET to `target`.
    ///
    /// Non-2xx statuses are returned as-is; only a round trip that cannot
    /// complete is an error.
    pub async fn fetch(&self, target: &Url, user_agent: &str) -> Result<UpstreamResponse> {
        debug!(%target, "fetching upstream");

        let response = self
            .client
            .get(target.clone())
            .header(USER_AGENT, user_agent)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        debug!(
            %target,
            status = status.as_u16(),
            content_type = content_type.as_deref().unwrap_or(""),
            bytes = body.len(),
            "upstream responded"
        );

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

// == Target Parsing ==
/// Validates the `url` parameter of the `/proxy` endpoint.
///
/// Absent or empty values are reported as missing; anything that is not an
/// absolute http(s) URL is invalid.
pub fn parse_target_url(raw: Option<&str>) -> Result<Url> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(ProxyError::BadRequest("Missing url parameter".to_string())),
    };

    match Url::parse(raw) {
        Ok(url) if is_http(&url) => Ok(url),
        _ => Err(ProxyError::BadRequest("Invalid url parameter".to_string())),
    }
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.has_host()
}
