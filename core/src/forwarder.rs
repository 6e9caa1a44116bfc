//! Stateless request translation for the maps proxy.
//!
//! # Design
//! `Forwarder` carries no state. One call goes through three steps:
//! `build_request` turns an `InboundRequest` into an `OutboundRequest`,
//! the host executes it, `parse_response` classifies the `UpstreamResponse`,
//! and `respond` turns the outcome into the `OutboundResponse` sent back.
//! CORS preflights short-circuit through `preflight` before any of that.

use std::time::Duration;

use crate::allowlist;
use crate::error::ProxyError;
use crate::http::{
    HttpMethod, InboundMethod, InboundRequest, OutboundRequest, OutboundResponse,
    UpstreamResponse, CONTENT_TYPE, GOOG_API_KEY,
};
use crate::types::ProxyPayload;

/// Wall-clock limit for one upstream call, measured from request start.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(25);

#[derive(Debug, Clone, Copy, Default)]
pub struct Forwarder;

impl Forwarder {
    pub fn new() -> Self {
        Self
    }

    /// The reply for an OPTIONS request, or `None` if the request must be
    /// forwarded.
    pub fn preflight(&self, inbound: &InboundRequest) -> Option<OutboundResponse> {
        (inbound.method == InboundMethod::Options).then(OutboundResponse::preflight)
    }

    /// Derive the upstream call for `inbound`.
    ///
    /// POST requests with a parsed body read `url`, `body` and `apiKey` from
    /// it; a non-empty `body` makes the upstream call a POST. GET requests
    /// take the percent-encoded target from the `url` query parameter.
    pub fn build_request(&self, inbound: &InboundRequest) -> Result<OutboundRequest, ProxyError> {
        let (target, body, api_key) = match (inbound.method, &inbound.parsed_body) {
            (InboundMethod::Post, Some(parsed)) => {
                let payload = ProxyPayload::from_value(parsed);
                (payload.url.unwrap_or_default(), payload.body, payload.api_key)
            }
            (InboundMethod::Get, _) => {
                let raw = inbound
                    .query_params
                    .get("url")
                    .filter(|v| !v.is_empty())
                    .ok_or(ProxyError::MissingTarget)?;
                let decoded = urlencoding::decode(raw).map_err(|_| ProxyError::InvalidTarget)?;
                (decoded.into_owned(), None, None)
            }
            _ => return Err(ProxyError::MissingTarget),
        };

        let url = allowlist::resolve_target(&target)?;

        let method = if body.is_some() {
            HttpMethod::Post
        } else {
            HttpMethod::Get
        };
        let mut headers = Vec::new();
        if method == HttpMethod::Post {
            headers.push((CONTENT_TYPE.to_string(), "application/json".to_string()));
        }
        if let Some(key) = api_key {
            headers.push((GOOG_API_KEY.to_string(), key));
        }

        Ok(OutboundRequest {
            method,
            url: url.into(),
            headers,
            body: body.map(String::into_bytes),
        })
    }

    /// Accept any 2xx payload as-is; everything else is an upstream error.
    pub fn parse_response(&self, response: UpstreamResponse) -> Result<Vec<u8>, ProxyError> {
        if (200..300).contains(&response.status) {
            Ok(response.body)
        } else {
            Err(ProxyError::Upstream {
                status: response.status,
            })
        }
    }

    pub fn respond(&self, outcome: Result<Vec<u8>, ProxyError>) -> OutboundResponse {
        match outcome {
            Ok(body) => OutboundResponse::success(body),
            Err(err) => OutboundResponse::from_error(&err),
        }
    }
}
