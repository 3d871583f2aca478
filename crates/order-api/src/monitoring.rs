//! # Monitoring Event Client
//!
//! Posts custom events to the New Relic Event API:
//!
//! ```text
//! POST {events_base_url}/v1/accounts/{account_id}/events
//! X-Insert-Key: {insert_key}
//! Content-Type: application/json
//! ```

use crate::config::MonitoringConfig;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

pub const INSERT_KEY_HEADER: &str = "X-Insert-Key";

#[derive(Debug, thiserror::Error)]
pub enum MonitoringError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("monitoring credentials missing: set NEW_RELIC_ACCOUNT_ID and NEW_RELIC_INSERT_KEY")]
    MissingCredentials,
    #[error("monitoring API unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("monitoring API answered {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Clone)]
pub struct MonitoringClient {
    http: reqwest::Client,
    config: MonitoringConfig,
}

impl MonitoringClient {
    pub fn new(config: MonitoringConfig, timeout: Duration) -> Result<Self, MonitoringError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(MonitoringError::Client)?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: reqwest::Client, config: MonitoringConfig) -> Self {
        Self { http, config }
    }

    pub fn events_url(&self, account_id: &str) -> String {
        format!(
            "{}/v1/accounts/{}/events",
            self.config.events_base_url, account_id
        )
    }

    /// Sends one event. Credentials are checked before any request is made.
    #[instrument(skip(self, event))]
    pub async fn send_event<T: Serialize + Sync + ?Sized>(
        &self,
        event: &T,
    ) -> Result<(), MonitoringError> {
        let (Some(account_id), Some(insert_key)) =
            (&self.config.account_id, &self.config.insert_key)
        else {
            return Err(MonitoringError::MissingCredentials);
        };

        let response = self
            .http
            .post(self.events_url(account_id))
            .header(INSERT_KEY_HEADER, insert_key)
            .json(event)
            .send()
            .await
            .map_err(MonitoringError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MonitoringError::Status {
                status: status.as_u16(),
                body,
            });
        }
        debug!(status = status.as_u16(), "Event accepted");
        Ok(())
    }
}
