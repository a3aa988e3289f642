//! Proxy Module
//!
//! Upstream round trips and the HTML rewriting applied to their responses.

pub mod transform;
pub mod upstream;

pub use transform::{inject_assets, is_html, transform, Injection, Transformed, HTML_CONTENT_TYPE};
pub use upstream::{
    parse_target_url, UpstreamClient, UpstreamResponse, FALLBACK_USER_AGENT, SERVICE_USER_AGENT,
};
