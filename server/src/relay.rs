//! Runs one inbound call through the core and the upstream.

use std::sync::Arc;

use maps_proxy_core::{Forwarder, InboundRequest, OutboundResponse, ProxyError, UPSTREAM_TIMEOUT};
use tracing::{debug, warn};

use crate::upstream::Upstream;

/// Async counterpart of `Forwarder`: preflight, build, send with the hard
/// timeout, classify, reply. Holds no per-call state, so one `Relay` serves
/// any number of concurrent calls.
#[derive(Clone)]
pub struct Relay {
    forwarder: Forwarder,
    upstream: Arc<dyn Upstream>,
}

impl Relay {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self {
            forwarder: Forwarder::new(),
            upstream,
        }
    }

    pub async fn handle(&self, inbound: InboundRequest) -> OutboundResponse {
        if let Some(reply) = self.forwarder.preflight(&inbound) {
            return reply;
        }

        let request = match self.forwarder.build_request(&inbound) {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, method = ?inbound.method, "rejected proxy request");
                return OutboundResponse::from_error(&err);
            }
        };

        let url = request.url.clone();
        let method = request.method.as_str();
        debug!(%url, method, "forwarding");

        // Dropping the send future on expiry aborts the in-flight connection.
        let outcome = match tokio::time::timeout(UPSTREAM_TIMEOUT, self.upstream.send(request)).await {
            Ok(result) => result,
            Err(_) => Err(ProxyError::Timeout),
        }
        .and_then(|response| self.forwarder.parse_response(response));

        if let Err(err) = &outcome {
            warn!(%url, method, error = %err, detail = ?err, "proxy failed");
        }
        self.forwarder.respond(outcome)
    }
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("forwarder", &self.forwarder)
            .finish_non_exhaustive()
    }
}
