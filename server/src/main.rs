use std::sync::Arc;

use anyhow::Context;
use maps_proxy::{Config, Relay, ReqwestUpstream};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().context("default log directive")?),
        )
        .init();

    let config = Config::from_env();
    let upstream = ReqwestUpstream::new().context("build upstream http client")?;
    let router = maps_proxy::app_with_config(Relay::new(Arc::new(upstream)), &config);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("bind {}", config.bind))?;
    tracing::info!(addr = %config.bind, region = ?config.region, "listening");
    maps_proxy::run(listener, router).await.context("serve")
}
