use serde::{Deserialize, Serialize};

/// Custom event type name under which failures show up in the monitoring backend.
pub const FAILED_ORDER_EVENT_TYPE: &str = "FailedOrder";

/// Monitoring event emitted for every dead-lettered order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedOrder {
    pub event_type: String,
    pub order_id: i64,
}

impl FailedOrder {
    pub fn new(order_id: i64) -> Self {
        Self {
            event_type: FAILED_ORDER_EVENT_TYPE.to_string(),
            order_id,
        }
    }
}
