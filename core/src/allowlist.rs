//! The fixed set of upstreams the proxy may reach.
//!
//! Targets are parsed before they are compared, so look-alike hosts such as
//! `https://maps.googleapis.com.evil.com/` or userinfo tricks never match.
//! The parsed, normalized URL is what gets forwarded.

use url::{Host, Url};

use crate::error::ProxyError;

/// Hosts reachable over HTTPS on the default port.
pub const ALLOWED_HOSTS: [&str; 2] = ["maps.googleapis.com", "places.googleapis.com"];

/// `ALLOWED_HOSTS` as URL prefixes. Every accepted target serializes with one
/// of these at its start.
pub const ALLOWED_PREFIXES: [&str; 2] = [
    "https://maps.googleapis.com/",
    "https://places.googleapis.com/",
];

/// Parse `raw` and accept it only if it points at an allowed upstream.
pub fn resolve_target(raw: &str) -> Result<Url, ProxyError> {
    let url = Url::parse(raw).map_err(|_| ProxyError::InvalidTarget)?;

    if url.scheme() != "https" || !url.username().is_empty() || url.password().is_some() {
        return Err(ProxyError::InvalidTarget);
    }
    if url.port().is_some() {
        return Err(ProxyError::InvalidTarget);
    }
    match url.host() {
        Some(Host::Domain(host)) if ALLOWED_HOSTS.contains(&host) => {}
        _ => return Err(ProxyError::InvalidTarget),
    }

    debug_assert!(ALLOWED_PREFIXES.iter().any(|p| url.as_str().starts_with(p)));
    Ok(url)
}
