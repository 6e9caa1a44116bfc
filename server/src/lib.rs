//! HTTP host for the maps proxy.
//!
//! Every path and method lands on one fallback handler that normalizes the
//! request, runs it through the `Relay` and sends back whatever it produced.

pub mod adapter;
pub mod config;
pub mod relay;
pub mod upstream;

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, RawQuery, State},
    http::{Method, Request},
    response::Response,
    Router,
};
use maps_proxy_core::OutboundResponse;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info_span;

pub use config::Config;
pub use relay::Relay;
pub use upstream::{ReqwestUpstream, Upstream};

pub fn app(relay: Relay) -> Router {
    Router::new()
        .fallback(forward)
        .with_state(Arc::new(relay))
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
            info_span!("http", method = %req.method(), path = %req.uri().path())
        }))
}

/// `app` with the configured inbound body limit.
pub fn app_with_config(relay: Relay, config: &Config) -> Router {
    app(relay).layer(DefaultBodyLimit::max(config.max_body_bytes))
}

pub async fn run(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn forward(
    State(relay): State<Arc<Relay>>,
    method: Method,
    RawQuery(query): RawQuery,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(%method, error = %rejection.body_text(), "rejected request body");
            let reply = OutboundResponse::error(rejection.status().as_u16(), rejection.body_text());
            return adapter::into_response(reply);
        }
    };
    let inbound = adapter::inbound_request(&method, query.as_deref(), &body);
    adapter::into_response(relay.handle(inbound).await)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}
