//! # Subscription Table
//!
//! The one place that pairs topics with inbound routes. `GET /dapr/subscribe` is
//! rendered from it and the router registers its POST handlers from it, so the two
//! cannot drift apart.

use crate::config::PubSubConfig;
use crate::model::Subscription;

pub const ORDERS_ROUTE: &str = "/orders";
pub const FAILED_ORDERS_ROUTE: &str = "/failedOrders";

/// Which handler serves a subscribed route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicHandler {
    Orders,
    FailedOrders,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionEntry {
    pub topic: String,
    pub route: &'static str,
    pub handler: TopicHandler,
}

#[derive(Debug, Clone)]
pub struct SubscriptionTable {
    pubsub_name: String,
    entries: Vec<SubscriptionEntry>,
}

impl SubscriptionTable {
    pub fn new(pubsub: &PubSubConfig) -> Self {
        Self {
            pubsub_name: pubsub.pubsub_name.clone(),
            entries: vec![
                SubscriptionEntry {
                    topic: pubsub.orders_topic.clone(),
                    route: ORDERS_ROUTE,
                    handler: TopicHandler::Orders,
                },
                SubscriptionEntry {
                    topic: pubsub.dead_letter_topic.clone(),
                    route: FAILED_ORDERS_ROUTE,
                    handler: TopicHandler::FailedOrders,
                },
            ],
        }
    }

    pub fn entries(&self) -> &[SubscriptionEntry] {
        &self.entries
    }

    /// Descriptors in the shape the sidecar reads at startup.
    pub fn descriptors(&self) -> Vec<Subscription> {
        self.entries
            .iter()
            .map(|entry| Subscription {
                pubsubname: self.pubsub_name.clone(),
                topic: entry.topic.clone(),
                route: entry.route.to_string(),
            })
            .collect()
    }
}
