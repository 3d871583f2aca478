use anyhow::Context;
use order_api::lifecycle::shutdown_signal;
use tracing::info;
use web_frontend::app::build_router;
use web_frontend::config::FrontendConfig;
use web_frontend::lifecycle::FrontendSystem;
use worker_framework::tracing::setup_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let config = FrontendConfig::from_env().context("load web frontend configuration")?;
    let system = FrontendSystem::start(&config)?;
    let app = build_router(system.state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "Web frontend listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve web frontend")?;

    system.shutdown().await;
    Ok(())
}
