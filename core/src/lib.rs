//! Request translation core for the maps proxy.
//!
//! # Overview
//! Validates an inbound call, builds the upstream call for it, classifies
//! the upstream answer and produces the reply, all without touching the
//! network (host-does-IO pattern). The hosting crate executes the actual
//! HTTPS round-trip and enforces the timeout.
//!
//! # Design
//! - `Forwarder` is stateless; calls never observe each other.
//! - The allow-list and the timeout are compile-time constants.
//! - Upstream payloads are opaque bytes, never parsed or re-encoded.

pub mod allowlist;
pub mod error;
pub mod forwarder;
pub mod http;
pub mod types;

pub use error::ProxyError;
pub use forwarder::{Forwarder, UPSTREAM_TIMEOUT};
pub use http::{
    HttpMethod, InboundMethod, InboundRequest, OutboundRequest, OutboundResponse, UpstreamResponse,
};
pub use types::{ErrorBody, ProxyPayload};
