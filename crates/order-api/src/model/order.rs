use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// An order as it travels over the broker.
///
/// `customerId` is optional on the wire and omitted when absent. Orders are never
/// mutated between hops; ingestion hands back the value it received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    pub order_id: i64,
}

impl Order {
    pub fn new(customer_id: Option<i64>, order_id: i64) -> Self {
        Self {
            customer_id,
            order_id,
        }
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.customer_id {
            Some(customer) => write!(f, "order_{} (customer_{})", self.order_id, customer),
            None => write!(f, "order_{}", self.order_id),
        }
    }
}

/// Envelope the sidecar wraps around every delivered message.
///
/// Only `data` is required. The remaining cloud-event attributes are kept when present
/// so handlers can log where a message came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicEvent<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pubsubname: Option<String>,
}
