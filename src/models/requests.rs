//! Request DTOs for the proxy server API
//!
//! Defines the query strings accepted by the named endpoints.

use serde::Deserialize;
use url::Url;

use crate::error::Result;
use crate::proxy::parse_target_url;

/// Query string of the API-proxy endpoint (GET /proxy?url=...)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyQuery {
    /// Absolute URL to fetch
    #[serde(default)]
    pub url: Option<String>,
}

impl ProxyQuery {
    /// Returns the validated target, or a `BadRequest` naming the problem.
    pub fn target(&self) -> Result<Url> {
        parse_target_url(self.url.as_deref())
    }
}
