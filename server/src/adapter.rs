//! Translation between axum's native request/response types and the core's
//! normalized ones.

use std::collections::HashMap;

use axum::{
    body::Body,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use maps_proxy_core::{InboundMethod, InboundRequest, OutboundResponse};
use serde_json::Value;

/// Normalize a request as axum received it.
///
/// The body is read as JSON whatever its `Content-Type`, since browsers send
/// `text/plain` to skip the preflight. Empty, unparseable and `null` bodies
/// count as no body at all.
pub fn inbound_request(method: &Method, query: Option<&str>, body: &[u8]) -> InboundRequest {
    let method = match *method {
        Method::GET => InboundMethod::Get,
        Method::POST => InboundMethod::Post,
        Method::OPTIONS => InboundMethod::Options,
        _ => InboundMethod::Other,
    };

    InboundRequest {
        method,
        query_params: query.map(parse_query).unwrap_or_default(),
        parsed_body: parse_body(body),
    }
}

/// `application/x-www-form-urlencoded` query; the first value of a repeated
/// key wins.
fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        params.entry(key.into_owned()).or_insert_with(|| value.into_owned());
    }
    params
}

fn parse_body(body: &[u8]) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    serde_json::from_slice::<Value>(body)
        .ok()
        .filter(|value| !value.is_null())
}

pub fn into_response(reply: OutboundResponse) -> Response {
    let mut builder = Response::builder().status(reply.status);
    for (name, value) in &reply.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    let body = reply.body.map(Body::from).unwrap_or_else(Body::empty);
    builder
        .body(body)
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
