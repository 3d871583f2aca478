//! # Order API
//!
//! Serves the order API on `APP_PORT` (default 5000) until Ctrl-C, then drains the
//! background publish pool before exiting. See [`order_api::config`] for every
//! environment variable.

use anyhow::Context;
use order_api::app::build_router;
use order_api::config::ApiConfig;
use order_api::lifecycle::{shutdown_signal, ApiSystem};
use tracing::info;
use worker_framework::tracing::setup_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let config = ApiConfig::from_env().context("load order API configuration")?;
    let system = ApiSystem::start(&config)?;
    let app = build_router(system.state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "Order API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve order API")?;

    system.shutdown().await;
    Ok(())
}
