//! # Dead-Letter Forwarder
//!
//! Hands a failed order to the background publish pool, addressed to the dead-letter
//! topic of the configured pub/sub component. The failure reason travels as publish
//! metadata (`metadata.reason`).
//!
//! Forwarding never waits on the sidecar. A full or stopped pool is reported to the
//! caller, which logs it; the letter is then dropped. There is no retry here: the
//! inbound 500 makes the broker redeliver the original order.

use crate::config::PubSubConfig;
use crate::ingestion::DeadLetter;
use crate::sidecar::{PublishError, PublishJob};
use std::sync::Arc;
use tracing::{debug, instrument};
use worker_framework::{FrameworkError, JobClient, WorkerClient};

pub const REASON_METADATA_KEY: &str = "reason";

#[derive(Debug, thiserror::Error)]
pub enum DeadLetterError {
    #[error("publish queue is full, dead letter dropped")]
    QueueFull,
    #[error("publish pool is not running")]
    PoolUnavailable,
    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Domain client over the publish pool for dead letters.
#[derive(Clone)]
pub struct DeadLetterForwarder {
    inner: WorkerClient<PublishJob>,
    pubsub: Arc<PubSubConfig>,
}

impl DeadLetterForwarder {
    pub fn new(inner: WorkerClient<PublishJob>, pubsub: Arc<PubSubConfig>) -> Self {
        Self { inner, pubsub }
    }

    /// Queues one publish of `letter.order` to the dead-letter topic.
    #[instrument(skip(self, letter), fields(order_id = letter.order.order_id, topic = %self.pubsub.dead_letter_topic))]
    pub fn forward(&self, letter: &DeadLetter) -> Result<(), DeadLetterError> {
        let job = PublishJob::new(
            self.pubsub.pubsub_name.as_str(),
            self.pubsub.dead_letter_topic.as_str(),
            &letter.order,
        )?
        .with_metadata(REASON_METADATA_KEY, letter.reason.as_str());

        self.fire(job)?;
        debug!("Dead letter queued");
        Ok(())
    }
}

impl JobClient<PublishJob> for DeadLetterForwarder {
    type Error = DeadLetterError;

    fn inner(&self) -> &WorkerClient<PublishJob> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> DeadLetterError {
        match e {
            FrameworkError::QueueFull => DeadLetterError::QueueFull,
            FrameworkError::JobError(inner) => match inner.downcast::<PublishError>() {
                Ok(publish) => DeadLetterError::Publish(*publish),
                Err(_) => DeadLetterError::PoolUnavailable,
            },
            FrameworkError::PoolClosed | FrameworkError::WorkerDropped => {
                DeadLetterError::PoolUnavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Order;
    use worker_framework::mock::{create_mock_client, expect_fire};
    use worker_framework::WorkerPool;

    fn letter(order_id: i64) -> DeadLetter {
        DeadLetter {
            order: Order::new(Some(8), order_id),
            reason: format!("Simulated failure for order {order_id}"),
        }
    }

    #[tokio::test]
    async fn forward_queues_one_publish_to_the_dead_letter_topic() {
        let (client, mut receiver) = create_mock_client::<PublishJob>(4);
        let forwarder = DeadLetterForwarder::new(client, Arc::new(PubSubConfig::default()));

        forwarder.forward(&letter(50)).unwrap();

        let job = expect_fire(&mut receiver).await.expect("one fire");
        assert_eq!(job.pubsub, "orderpubsub");
        assert_eq!(job.topic, "deadletters");
        assert_eq!(job.payload, serde_json::json!({"customerId": 8, "orderId": 50}));
        assert!(job.metadata(REASON_METADATA_KEY).unwrap().contains("50"));
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn full_queue_is_reported_not_awaited() {
        // Nothing drains the receiver, so the second forward finds the queue full.
        let (client, _receiver) = create_mock_client::<PublishJob>(1);
        let forwarder = DeadLetterForwarder::new(client, Arc::new(PubSubConfig::default()));

        forwarder.forward(&letter(10)).unwrap();
        let err = forwarder.forward(&letter(20)).unwrap_err();
        assert!(matches!(err, DeadLetterError::QueueFull));
    }

    #[tokio::test]
    async fn stopped_pool_is_reported() {
        let (pool, client) = WorkerPool::<PublishJob>::new(4, 1);
        drop(pool);
        let forwarder = DeadLetterForwarder::new(client, Arc::new(PubSubConfig::default()));

        let err = forwarder.forward(&letter(30)).unwrap_err();
        assert!(matches!(err, DeadLetterError::PoolUnavailable));
    }

    #[test]
    fn job_errors_map_back_to_publish_errors() {
        let err = DeadLetterForwarder::map_error(FrameworkError::JobError(Box::new(
            PublishError::Rejected {
                status: 500,
                body: String::new(),
            },
        )));
        assert!(matches!(
            err,
            DeadLetterError::Publish(PublishError::Rejected { status: 500, .. })
        ));
    }
}
