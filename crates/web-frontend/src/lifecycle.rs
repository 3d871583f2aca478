//! Startup and graceful shutdown of the frontend.
//!
//! Same shape as the order API: spawn the publish pool, hand its client to the
//! weather client, and on shutdown drop the state so the pool drains and exits.

use crate::app::FrontendState;
use crate::config::FrontendConfig;
use crate::weather_client::{OrderPublisher, WeatherApiClient};
use anyhow::Context;
use order_api::sidecar::{PublishJob, SidecarPublisher};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use worker_framework::WorkerPool;

pub struct FrontendSystem {
    state: FrontendState,
    publisher_handle: JoinHandle<()>,
}

impl FrontendSystem {
    pub fn start(config: &FrontendConfig) -> anyhow::Result<Self> {
        let publisher = SidecarPublisher::new(&config.sidecar, config.outbound_timeout)
            .context("create sidecar publisher")?;
        info!(
            sidecar = %publisher.endpoint(),
            api_app_id = %config.api_app_id,
            "Starting web frontend"
        );

        let (pool, publish_client) =
            WorkerPool::<PublishJob>::new(config.pool.queue_capacity, config.pool.concurrency);
        let publisher_handle = tokio::spawn(pool.run(publisher));

        let weather = WeatherApiClient::new(
            config.sidecar.endpoint(),
            config.api_app_id.as_str(),
            Arc::new(config.pubsub.clone()),
            OrderPublisher::new(publish_client),
            config.outbound_timeout,
        )
        .context("create weather API client")?;

        Ok(Self {
            state: FrontendState {
                weather: Arc::new(weather),
            },
            publisher_handle,
        })
    }

    pub fn state(&self) -> FrontendState {
        self.state.clone()
    }

    pub async fn shutdown(self) {
        drop(self.state);
        if let Err(e) = self.publisher_handle.await {
            warn!(error = %e, "Publish pool task ended abnormally");
        }
        info!("Web frontend stopped");
    }
}
