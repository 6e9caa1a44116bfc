//! Executes `OutboundRequest`s against the real upstream.

use async_trait::async_trait;
use maps_proxy_core::{HttpMethod, OutboundRequest, ProxyError, UpstreamResponse, UPSTREAM_TIMEOUT};
use reqwest::redirect::Policy;

/// One HTTPS round-trip, answered with the full upstream body.
///
/// Implementations report non-2xx statuses as data; classification belongs
/// to the `Forwarder`.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, ProxyError>;
}

/// `Upstream` backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestUpstream {
    client: reqwest::Client,
}

impl ReqwestUpstream {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .redirect(Policy::none())
            .build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Upstream for ReqwestUpstream {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, ProxyError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };
        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| transport_error(&request.url, e))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(&request.url, e))?;

        Ok(UpstreamResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// The caller only gets the innermost cause; the full chain, which names the
/// target URL, stays in the log.
fn transport_error(url: &str, err: reqwest::Error) -> ProxyError {
    tracing::debug!(url, error = %error_chain(&err), detail = ?err, "upstream transport failure");
    if err.is_timeout() {
        return ProxyError::Timeout;
    }
    ProxyError::Transport(root_cause(&err))
}

/// `reqwest` hides the interesting part (refused, DNS, TLS) at the bottom of
/// the source chain.
fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut cause = err;
    while let Some(source) = cause.source() {
        cause = source;
    }
    cause.to_string()
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
