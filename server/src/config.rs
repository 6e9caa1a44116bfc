//! Process configuration, read once from the environment at startup.
//!
//! Unset or unparseable values fall back to their defaults. Nothing here
//! reaches the `Forwarder`; the allow-list and timeout are fixed in the core.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind: SocketAddr,
    pub max_body_bytes: usize,
    /// Deployment region label. Informational only.
    pub region: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            region: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. `MAPS_PROXY_BIND` wins over
    /// `MAPS_PROXY_HOST` + `PORT`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("MAPS_PROXY_HOST")
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
            .unwrap_or(defaults.bind.ip());
        let port = lookup("PORT")
            .and_then(|v| v.trim().parse::<u16>().ok())
            .unwrap_or(defaults.bind.port());
        let bind = lookup("MAPS_PROXY_BIND")
            .and_then(|v| v.trim().parse::<SocketAddr>().ok())
            .unwrap_or(SocketAddr::new(host, port));

        let max_body_bytes = lookup("MAPS_PROXY_MAX_BODY_BYTES")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(defaults.max_body_bytes);

        let region = lookup("MAPS_PROXY_REGION")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            bind,
            max_body_bytes,
            region,
        }
    }
}
