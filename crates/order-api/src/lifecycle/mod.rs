//! # System Lifecycle & Orchestration
//!
//! Starts the background publish pool, wires the clients into the handler state and
//! shuts everything down in the right order.
//!
//! ## Startup
//!
//! ```rust,ignore
//! let (pool, publish_client) = WorkerPool::<PublishJob>::new(capacity, concurrency);
//! let handle = tokio::spawn(pool.run(publisher));   // context injected at run time
//! let state = AppState::new(pubsub, DeadLetterForwarder::new(publish_client, ..), ..);
//! ```
//!
//! ## Graceful Shutdown
//!
//! 1. **Stop serving** - `axum::serve` returns after Ctrl-C and drops the router
//! 2. **Drop the state** - the last `WorkerClient` goes away and the queue closes
//! 3. **Drain** - the pool finishes queued and in-flight publishes
//! 4. **Await** - `shutdown` returns once the pool task has ended
//!
//! Dead letters accepted before shutdown are therefore still published.

use crate::app::AppState;
use crate::config::ApiConfig;
use crate::dead_letter::DeadLetterForwarder;
use crate::failed_orders::FailedOrderReporter;
use crate::monitoring::MonitoringClient;
use crate::sidecar::{PublishJob, SidecarPublisher};
use anyhow::Context;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use worker_framework::WorkerPool;

pub struct ApiSystem {
    state: AppState,
    publisher_handle: JoinHandle<()>,
}

impl ApiSystem {
    /// Spawns the publish pool and builds the handler state. Needs a tokio runtime.
    pub fn start(config: &ApiConfig) -> anyhow::Result<Self> {
        let publisher = SidecarPublisher::new(&config.sidecar, config.outbound_timeout)
            .context("create sidecar publisher")?;
        let monitoring = MonitoringClient::new(config.monitoring.clone(), config.outbound_timeout)
            .context("create monitoring client")?;
        if config.monitoring.account_id.is_none() || config.monitoring.insert_key.is_none() {
            warn!("Monitoring credentials missing, failed orders will only be logged");
        }

        info!(
            sidecar = %publisher.endpoint(),
            pubsub = %config.pubsub.pubsub_name,
            orders_topic = %config.pubsub.orders_topic,
            dead_letter_topic = %config.pubsub.dead_letter_topic,
            "Starting order API system"
        );

        let (pool, publish_client) =
            WorkerPool::<PublishJob>::new(config.pool.queue_capacity, config.pool.concurrency);
        let publisher_handle = tokio::spawn(pool.run(publisher));

        let pubsub = Arc::new(config.pubsub.clone());
        let state = AppState::new(
            pubsub.clone(),
            DeadLetterForwarder::new(publish_client, pubsub),
            FailedOrderReporter::new(monitoring),
        );

        Ok(Self {
            state,
            publisher_handle,
        })
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Closes the publish queue and waits until every accepted publish has run.
    pub async fn shutdown(self) {
        info!("Shutting down order API system");
        drop(self.state);
        if let Err(e) = self.publisher_handle.await {
            warn!(error = %e, "Publish pool task ended abnormally");
        }
        info!("Order API system stopped");
    }
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Ctrl-C handler unavailable");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
