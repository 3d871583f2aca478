//! # Sidecar Publisher
//!
//! HTTP client for the sidecar's publish API:
//!
//! ```text
//! POST {BASE_URL}:{DAPR_HTTP_PORT}/v1.0/publish/{pubsub}/{topic}?metadata.{key}={value}
//! ```
//!
//! [`PublishJob`] wraps one publish as a [`WorkerJob`] so it runs on the bounded
//! background pool. The pool's context is the [`SidecarPublisher`] itself, which owns
//! the `reqwest::Client` and the sidecar endpoint.

use crate::config::SidecarConfig;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};
use worker_framework::WorkerJob;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("sidecar unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("sidecar rejected publish with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Sends publish requests to the local sidecar.
#[derive(Debug, Clone)]
pub struct SidecarPublisher {
    http: reqwest::Client,
    endpoint: String,
}

impl SidecarPublisher {
    pub fn new(sidecar: &SidecarConfig, timeout: Duration) -> Result<Self, PublishError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(PublishError::Client)?;
        Ok(Self::with_client(http, sidecar.endpoint()))
    }

    pub fn with_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn publish_url(&self, pubsub: &str, topic: &str) -> String {
        format!("{}/v1.0/publish/{}/{}", self.endpoint, pubsub, topic)
    }

    /// Publishes `payload` as JSON. Returns the sidecar's status on 2xx.
    #[instrument(skip(self, payload, metadata), fields(endpoint = %self.endpoint))]
    pub async fn publish<T: Serialize + ?Sized>(
        &self,
        pubsub: &str,
        topic: &str,
        payload: &T,
        metadata: &[(String, String)],
    ) -> Result<u16, PublishError> {
        let query: Vec<(String, &str)> = metadata
            .iter()
            .map(|(key, value)| (format!("metadata.{key}"), value.as_str()))
            .collect();

        let response = self
            .http
            .post(self.publish_url(pubsub, topic))
            .query(&query)
            .json(payload)
            .send()
            .await
            .map_err(PublishError::Transport)?;

        let status = response.status();
        debug!(status = status.as_u16(), "Publish answered");
        if status.is_success() {
            Ok(status.as_u16())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// One message to publish through the sidecar.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishJob {
    pub pubsub: String,
    pub topic: String,
    pub payload: serde_json::Value,
    pub metadata: Vec<(String, String)>,
}

impl PublishJob {
    pub fn new<T: Serialize>(
        pubsub: impl Into<String>,
        topic: impl Into<String>,
        payload: &T,
    ) -> Result<Self, PublishError> {
        Ok(Self {
            pubsub: pubsub.into(),
            topic: topic.into(),
            payload: serde_json::to_value(payload)?,
            metadata: Vec::new(),
        })
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[async_trait]
impl WorkerJob for PublishJob {
    /// HTTP status the sidecar answered with.
    type Output = u16;
    type Context = SidecarPublisher;
    type Error = PublishError;

    fn kind(&self) -> &'static str {
        "publish"
    }

    async fn execute(self, publisher: &SidecarPublisher) -> Result<u16, PublishError> {
        publisher
            .publish(&self.pubsub, &self.topic, &self.payload, &self.metadata)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Order;
    use mockito::{Matcher, Server};
    use worker_framework::{FrameworkError, WorkerPool};

    fn publisher(url: &str) -> SidecarPublisher {
        SidecarPublisher::with_client(reqwest::Client::new(), url)
    }

    #[tokio::test]
    async fn publishes_json_to_topic_with_metadata() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1.0/publish/orderpubsub/deadletters")
            .match_query(Matcher::UrlEncoded(
                "metadata.reason".into(),
                "order 50 failed".into(),
            ))
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({"orderId": 50})))
            .with_status(204)
            .create_async()
            .await;

        let job = PublishJob::new("orderpubsub", "deadletters", &Order::new(None, 50))
            .unwrap()
            .with_metadata("reason", "order 50 failed");
        let status = job.execute(&publisher(&server.url())).await.unwrap();

        assert_eq!(status, 204);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_rejected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1.0/publish/orderpubsub/orders")
            .with_status(404)
            .with_body("ERR_PUBSUB_NOT_FOUND")
            .create_async()
            .await;

        let job = PublishJob::new("orderpubsub", "orders", &Order::new(Some(1), 2)).unwrap();
        let err = job.execute(&publisher(&server.url())).await.unwrap_err();

        match err {
            PublishError::Rejected { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "ERR_PUBSUB_NOT_FOUND");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_sidecar_is_a_transport_error() {
        // Port 9 (discard) on loopback is closed in test environments.
        let job = PublishJob::new("orderpubsub", "orders", &Order::new(None, 3)).unwrap();
        let err = job
            .execute(&publisher("http://127.0.0.1:9"))
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::Transport(_)));
    }

    #[tokio::test]
    async fn pool_runs_publish_jobs_against_the_sidecar() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1.0/publish/orderpubsub/orders")
            .with_status(200)
            .expect(2)
            .create_async()
            .await;

        let (pool, client) = WorkerPool::<PublishJob>::new(4, 2);
        let handle = tokio::spawn(pool.run(publisher(&server.url())));

        let job = PublishJob::new("orderpubsub", "orders", &Order::new(None, 1)).unwrap();
        client.submit(job.clone()).unwrap();
        assert_eq!(client.call(job).await.unwrap(), 200);

        drop(client);
        handle.await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_call_is_downcastable() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1.0/publish/orderpubsub/orders")
            .with_status(500)
            .create_async()
            .await;

        let (pool, client) = WorkerPool::<PublishJob>::new(4, 1);
        tokio::spawn(pool.run(publisher(&server.url())));

        let job = PublishJob::new("orderpubsub", "orders", &Order::new(None, 1)).unwrap();
        let err: FrameworkError = client.call(job).await.unwrap_err();
        assert!(matches!(
            err.job_error::<PublishError>(),
            Some(PublishError::Rejected { status: 500, .. })
        ));
    }

    #[test]
    fn url_uses_sidecar_endpoint() {
        let sidecar = SidecarConfig {
            base_url: "http://localhost".into(),
            http_port: 3500,
        };
        let publisher = SidecarPublisher::new(&sidecar, Duration::from_secs(1)).unwrap();
        assert_eq!(
            publisher.publish_url("orderpubsub", "orders"),
            "http://localhost:3500/v1.0/publish/orderpubsub/orders"
        );
    }
}
