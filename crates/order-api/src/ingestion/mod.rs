//! # Order Ingestion
//!
//! Applies the [`policy`] to an inbound order. A simulated failure is returned as a
//! value ([`IngestOutcome::Failed`]) carrying the [`DeadLetter`] to forward. The HTTP
//! layer forwards it and then answers 500 so the broker redelivers.
//!
//! ```text
//! Received ──► Failing  ──► Failed(DeadLetter)
//!          ├─► Delaying ──► Completed(order)
//!          └─────────────► Completed(order)
//! ```
//!
//! No state is carried between orders.

pub mod policy;

use crate::model::Order;
use policy::Disposition;
use tracing::{debug, info};

pub use policy::classify;

/// A failed order together with the reason it is being dead-lettered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLetter {
    pub order: Order,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Completed(Order),
    Failed(DeadLetter),
}

pub struct OrderIngestion;

impl OrderIngestion {
    /// Classifies with the thread RNG and applies the result.
    pub async fn handle(order: Order) -> IngestOutcome {
        let disposition = classify(order.order_id, &mut rand::rng());
        Self::apply(order, disposition).await
    }

    /// Applies an already chosen disposition. A delay suspends only this task.
    pub async fn apply(order: Order, disposition: Disposition) -> IngestOutcome {
        match disposition {
            Disposition::Fail { reason } => {
                info!(order_id = order.order_id, %reason, "Order failed");
                IngestOutcome::Failed(DeadLetter { order, reason })
            }
            Disposition::Delay(delay) => {
                debug!(order_id = order.order_id, delay_ms = delay.as_millis() as u64, "Delaying order");
                tokio::time::sleep(delay).await;
                info!(order_id = order.order_id, "Order completed after delay");
                IngestOutcome::Completed(order)
            }
            Disposition::Accept => {
                info!(order_id = order.order_id, "Order completed");
                IngestOutcome::Completed(order)
            }
        }
    }
}
