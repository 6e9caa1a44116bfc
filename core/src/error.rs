//! Error taxonomy for one proxied call.
//!
//! # Design
//! The two rejection kinds (`MissingTarget`, `InvalidTarget`) are the
//! caller's fault and answer 400 with their own message. Everything that
//! goes wrong after the request left for the upstream answers 502 with the
//! message prefixed by `Proxy failed: `.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// No usable target URL in the request.
    #[error("Missing url")]
    MissingTarget,

    /// The target is malformed or outside the allow-list.
    #[error("Invalid url")]
    InvalidTarget,

    /// The upstream did not answer within the forwarding timeout.
    #[error("Timeout")]
    Timeout,

    /// The upstream answered with a status outside [200, 300).
    #[error("HTTP {status}")]
    Upstream { status: u16 },

    /// DNS, connect, TLS, protocol or body-read failure.
    #[error("{0}")]
    Transport(String),
}

impl ProxyError {
    /// HTTP status the caller receives for this error.
    pub fn status(&self) -> u16 {
        match self {
            ProxyError::MissingTarget | ProxyError::InvalidTarget => 400,
            ProxyError::Timeout | ProxyError::Upstream { .. } | ProxyError::Transport(_) => 502,
        }
    }

    /// Text placed in the `error` field of the JSON reply.
    pub fn client_message(&self) -> String {
        match self {
            ProxyError::MissingTarget | ProxyError::InvalidTarget => self.to_string(),
            _ => format!("Proxy failed: {self}"),
        }
    }
}
