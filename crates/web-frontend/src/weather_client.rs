//! # Weather API Client
//!
//! The frontend's only way to reach the order API. Both calls go through the local
//! sidecar:
//!
//! - forecasts via service invocation,
//!   `GET {sidecar}/v1.0/invoke/{app_id}/method/weatherforecast`
//! - orders via publish on the orders topic, executed on the background pool.
use order_api::config::PubSubConfig;
use order_api::model::{Order, WeatherForecast};
use order_api::sidecar::{PublishError, PublishJob};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use worker_framework::{FrameworkError, JobClient, WorkerClient};

#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("sidecar unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("weather API answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed weather response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Publishes orders on the background pool and waits for the sidecar's answer.
#[derive(Clone)]
pub struct OrderPublisher {
    inner: WorkerClient<PublishJob>,
}

impl OrderPublisher {
    pub fn new(inner: WorkerClient<PublishJob>) -> Self {
        Self { inner }
    }
}

impl JobClient<PublishJob> for OrderPublisher {
    type Error = FrameworkError;

    fn inner(&self) -> &WorkerClient<PublishJob> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> FrameworkError {
        e
    }
}

pub struct WeatherApiClient {
    http: reqwest::Client,
    sidecar_endpoint: String,
    api_app_id: String,
    pubsub: Arc<PubSubConfig>,
    orders: OrderPublisher,
}

impl WeatherApiClient {
    pub fn new(
        sidecar_endpoint: impl Into<String>,
        api_app_id: impl Into<String>,
        pubsub: Arc<PubSubConfig>,
        orders: OrderPublisher,
        timeout: Duration,
    ) -> Result<Self, FrontendError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FrontendError::Client)?;
        Ok(Self {
            http,
            sidecar_endpoint: sidecar_endpoint.into(),
            api_app_id: api_app_id.into(),
            pubsub,
            orders,
        })
    }

    pub fn weather_url(&self) -> String {
        format!(
            "{}/v1.0/invoke/{}/method/weatherforecast",
            self.sidecar_endpoint, self.api_app_id
        )
    }

    #[instrument(skip(self), fields(app_id = %self.api_app_id))]
    pub async fn get_weather(&self) -> Result<Vec<WeatherForecast>, FrontendError> {
        info!("Making request to weather API");
        let response = self
            .http
            .get(self.weather_url())
            .send()
            .await
            .map_err(FrontendError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FrontendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response.json().await.map_err(FrontendError::Decode)
    }

    /// Publishes `{customerId, orderId}` to the orders topic.
    ///
    /// `true` once the sidecar answered, whatever the status (a non-2xx is logged).
    /// `false` when the publish could not be issued at all.
    #[instrument(skip(self), fields(topic = %self.pubsub.orders_topic))]
    pub async fn submit_order(&self, customer_id: i64, order_id: i64) -> bool {
        info!(
            sidecar = %self.sidecar_endpoint,
            pubsub = %self.pubsub.pubsub_name,
            "Submitting order"
        );
        let order = Order::new(Some(customer_id), order_id);
        let job = match PublishJob::new(
            self.pubsub.pubsub_name.as_str(),
            self.pubsub.orders_topic.as_str(),
            &order,
        ) {
            Ok(job) => job,
            Err(e) => {
                warn!(error = %e, "Order not encodable");
                return false;
            }
        };

        match self.orders.call(job).await {
            Ok(status) => {
                info!(status, "Order published");
                true
            }
            Err(e) => match e.job_error::<PublishError>() {
                Some(PublishError::Rejected { status, body }) => {
                    warn!(status, %body, "Sidecar rejected order");
                    true
                }
                _ => {
                    warn!(error = %e, "Order not published");
                    false
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worker_framework::mock::MockClient;

    fn client(sidecar: &str, orders: WorkerClient<PublishJob>) -> WeatherApiClient {
        WeatherApiClient::new(
            sidecar,
            "api",
            Arc::new(PubSubConfig::default()),
            OrderPublisher::new(orders),
            Duration::from_secs(2),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn get_weather_invokes_the_api_through_the_sidecar() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1.0/invoke/api/method/weatherforecast")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"date":"2025-01-01","temperatureC":10,"temperatureF":49,"summary":"Cool"}]"#,
            )
            .create_async()
            .await;

        let mock_orders = MockClient::<PublishJob>::new();
        let forecasts = client(&server.url(), mock_orders.client())
            .get_weather()
            .await
            .unwrap();

        assert_eq!(forecasts.len(), 1);
        assert_eq!(forecasts[0].temperature_f, 49);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_weather_propagates_upstream_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1.0/invoke/api/method/weatherforecast")
            .with_status(500)
            .with_body("ERR_DIRECT_INVOKE")
            .create_async()
            .await;

        let mock_orders = MockClient::<PublishJob>::new();
        let err = client(&server.url(), mock_orders.client())
            .get_weather()
            .await
            .unwrap_err();
        assert!(matches!(err, FrontendError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn get_weather_rejects_malformed_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1.0/invoke/api/method/weatherforecast")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let mock_orders = MockClient::<PublishJob>::new();
        let err = client(&server.url(), mock_orders.client())
            .get_weather()
            .await
            .unwrap_err();
        assert!(matches!(err, FrontendError::Decode(_)));
    }

    #[tokio::test]
    async fn submit_order_publishes_to_the_orders_topic() {
        let mut mock_orders = MockClient::<PublishJob>::new();
        mock_orders.expect_call().return_ok(204);

        let submitted = client("http://127.0.0.1:9", mock_orders.client())
            .submit_order(11, 22)
            .await;

        assert!(submitted);
        mock_orders.verify();
        let jobs = mock_orders.received();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].pubsub, "orderpubsub");
        assert_eq!(jobs[0].topic, "orders");
        assert_eq!(
            jobs[0].payload,
            serde_json::json!({"customerId": 11, "orderId": 22})
        );
    }

    #[tokio::test]
    async fn rejected_publish_still_counts_as_submitted() {
        let mut mock_orders = MockClient::<PublishJob>::new();
        mock_orders
            .expect_call()
            .return_err(FrameworkError::JobError(Box::new(PublishError::Rejected {
                status: 500,
                body: String::new(),
            })));

        assert!(client("http://127.0.0.1:9", mock_orders.client())
            .submit_order(1, 2)
            .await);
    }

    #[tokio::test]
    async fn unreachable_pool_is_not_submitted() {
        let mut mock_orders = MockClient::<PublishJob>::new();
        mock_orders
            .expect_call()
            .return_err(FrameworkError::PoolClosed);

        assert!(!client("http://127.0.0.1:9", mock_orders.client())
            .submit_order(1, 2)
            .await);
    }
}
