//! `ReqwestUpstream` against a live local server.
//!
//! # Design
//! Starts a small axum app on a random port that records what it receives,
//! then sends `OutboundRequest`s to it over real HTTP. The allow-list is not
//! involved here; it lives in the core and is covered there.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    routing::{any, get},
    Router,
};
use maps_proxy::{ReqwestUpstream, Upstream};
use maps_proxy_core::{HttpMethod, OutboundRequest, ProxyError};

#[derive(Debug, Clone)]
struct Received {
    method: Method,
    headers: HeaderMap,
    body: Bytes,
}

type Log = Arc<Mutex<Vec<Received>>>;

async fn record(State(log): State<Log>, method: Method, headers: HeaderMap, body: Bytes) -> &'static str {
    log.lock().unwrap().push(Received {
        method,
        headers,
        body,
    });
    "{\n  \"results\" : []\n}\n"
}

async fn spawn_upstream() -> (SocketAddr, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/ok", any(record))
        .route("/forbidden", get(|| async { (StatusCode::FORBIDDEN, "denied") }))
        .route("/moved", get(|| async { (StatusCode::FOUND, [("location", "/ok")], "") }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        )
        .with_state(log.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, log)
}

fn request(method: HttpMethod, url: String) -> OutboundRequest {
    OutboundRequest {
        method,
        url,
        headers: Vec::new(),
        body: None,
    }
}

#[tokio::test]
async fn get_returns_status_and_raw_body() {
    let (addr, log) = spawn_upstream().await;
    let upstream = ReqwestUpstream::new().unwrap();

    let mut req = request(HttpMethod::Get, format!("http://{addr}/ok"));
    req.headers.push(("X-Goog-Api-Key".to_string(), "K".to_string()));
    let response = upstream.send(req).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, b"{\n  \"results\" : []\n}\n");

    let received = log.lock().unwrap().clone();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].method, Method::GET);
    assert_eq!(received[0].headers["x-goog-api-key"], "K");
    assert!(received[0].headers.get("content-type").is_none());
    assert!(received[0].body.is_empty());
}

#[tokio::test]
async fn post_sends_headers_and_body_verbatim() {
    let (addr, log) = spawn_upstream().await;
    let upstream = ReqwestUpstream::new().unwrap();

    let req = OutboundRequest {
        method: HttpMethod::Post,
        url: format!("http://{addr}/ok"),
        headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        body: Some(br#"{"textQuery":"coffee"}"#.to_vec()),
    };
    let response = upstream.send(req).await.unwrap();
    assert_eq!(response.status, 200);

    let received = log.lock().unwrap().clone();
    assert_eq!(received[0].method, Method::POST);
    assert_eq!(received[0].headers["content-type"], "application/json");
    assert_eq!(received[0].body.as_ref(), br#"{"textQuery":"coffee"}"#);
}

#[tokio::test]
async fn non_2xx_is_returned_as_data() {
    let (addr, _log) = spawn_upstream().await;
    let upstream = ReqwestUpstream::new().unwrap();

    let response = upstream
        .send(request(HttpMethod::Get, format!("http://{addr}/forbidden")))
        .await
        .unwrap();
    assert_eq!(response.status, 403);
    assert_eq!(response.body, b"denied");
}

#[tokio::test]
async fn redirects_are_not_followed() {
    let (addr, log) = spawn_upstream().await;
    let upstream = ReqwestUpstream::new().unwrap();

    let response = upstream
        .send(request(HttpMethod::Get, format!("http://{addr}/moved")))
        .await
        .unwrap();
    assert_eq!(response.status, 302);
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn client_timeout_maps_to_timeout() {
    let (addr, _log) = spawn_upstream().await;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let upstream = ReqwestUpstream::from_client(client);

    let err = upstream
        .send(request(HttpMethod::Get, format!("http://{addr}/slow")))
        .await
        .unwrap_err();
    assert_eq!(err, ProxyError::Timeout);
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let upstream = ReqwestUpstream::new().unwrap();
    let err = upstream
        .send(request(HttpMethod::Get, format!("http://{addr}/ok")))
        .await
        .unwrap_err();
    match err {
        ProxyError::Transport(message) => {
            assert!(!message.is_empty());
            assert!(!message.contains(&addr.to_string()), "{message}");
            assert!(!message.contains("error sending request"), "{message}");
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}
