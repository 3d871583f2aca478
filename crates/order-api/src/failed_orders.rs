//! # Failed-Order Reporter
//!
//! Receives dead-lettered orders and records a `FailedOrder` event in monitoring.
//! Monitoring trouble is logged and absorbed: the caller always gets the order back,
//! so a monitoring outage never makes the broker redeliver.

use crate::model::{FailedOrder, Order};
use crate::monitoring::MonitoringClient;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct FailedOrderReporter {
    monitoring: MonitoringClient,
}

impl FailedOrderReporter {
    pub fn new(monitoring: MonitoringClient) -> Self {
        Self { monitoring }
    }

    /// Forwards the failure to monitoring and returns `order` whatever happened.
    pub async fn report(&self, order: Order) -> Order {
        let event = FailedOrder::new(order.order_id);
        match self.monitoring.send_event(&event).await {
            Ok(()) => info!(order_id = order.order_id, "Failed order recorded in monitoring"),
            Err(e) => warn!(order_id = order.order_id, error = %e, "Failed order not recorded"),
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitoringConfig;
    use mockito::Server;

    #[tokio::test]
    async fn order_is_returned_when_monitoring_fails() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/accounts/7/events")
            .with_status(500)
            .create_async()
            .await;

        let reporter = FailedOrderReporter::new(MonitoringClient::with_client(
            reqwest::Client::new(),
            MonitoringConfig {
                account_id: Some("7".into()),
                insert_key: Some("key".into()),
                events_base_url: server.url(),
            },
        ));

        let order = Order::new(Some(3), 40);
        assert_eq!(reporter.report(order.clone()).await, order);
        mock.assert_async().await;
    }
}
