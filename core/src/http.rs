//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe the inbound call, the outbound upstream call, and the
//! final reply as plain data. The core builds `OutboundRequest` values and
//! classifies `UpstreamResponse` values without ever touching the network.
//! The host owns sockets, TLS and the timeout, and translates its native
//! request/response shapes into these at the boundary.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::ProxyError;
use crate::types::ErrorBody;

pub const ACCESS_CONTROL_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ACCESS_CONTROL_ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ACCESS_CONTROL_ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const GOOG_API_KEY: &str = "X-Goog-Api-Key";

const APPLICATION_JSON: &str = "application/json";

/// Method of a request arriving at the proxy.
///
/// Anything the host receives that is not GET, POST or OPTIONS lands in
/// `Other` and is answered like a request with no target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundMethod {
    Get,
    Post,
    Options,
    Other,
}

/// A request as normalized by the hosting adapter.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: InboundMethod,
    pub query_params: HashMap<String, String>,
    /// JSON body, present only when the host could parse one.
    pub parsed_body: Option<Value>,
}

impl InboundRequest {
    pub fn new(method: InboundMethod) -> Self {
        Self {
            method,
            query_params: HashMap::new(),
            parsed_body: None,
        }
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query_params.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.parsed_body = Some(body);
        self
    }
}

/// Method of the call sent upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// The upstream call described as plain data.
///
/// Built by `Forwarder::build_request`. The host executes it and hands back
/// an `UpstreamResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl OutboundRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// What the upstream answered, collected in full by the host.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// The reply sent back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl OutboundResponse {
    /// 204 answer to a CORS preflight.
    pub fn preflight() -> Self {
        Self {
            status: 204,
            headers: vec![
                (ACCESS_CONTROL_ALLOW_ORIGIN.to_string(), "*".to_string()),
                (ACCESS_CONTROL_ALLOW_METHODS.to_string(), "GET, POST".to_string()),
                (ACCESS_CONTROL_ALLOW_HEADERS.to_string(), CONTENT_TYPE.to_string()),
            ],
            body: None,
        }
    }

    /// 200 carrying the upstream payload untouched.
    pub fn success(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            headers: json_headers(),
            body: Some(body),
        }
    }

    pub fn from_error(err: &ProxyError) -> Self {
        Self::error(err.status(), err.client_message())
    }

    /// JSON error reply for a request the host refused before the
    /// `Forwarder` saw it, e.g. an oversized body.
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        let body = ErrorBody {
            error: message.into(),
        };
        Self {
            status,
            headers: json_headers(),
            body: Some(body.to_vec()),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![
        (ACCESS_CONTROL_ALLOW_ORIGIN.to_string(), "*".to_string()),
        (CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()),
    ]
}

/// Case-insensitive header lookup.
fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
