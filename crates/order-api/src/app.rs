//! Order API HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router and defines the shared state injected into handlers.
//!
//! # Notes
//! Topic routes are registered from the [`SubscriptionTable`], the same table that
//! `GET /dapr/subscribe` renders.
use crate::config::PubSubConfig;
use crate::dead_letter::DeadLetterForwarder;
use crate::failed_orders::FailedOrderReporter;
use crate::handlers;
use crate::subscriptions::{SubscriptionTable, TopicHandler};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub pubsub: Arc<PubSubConfig>,
    pub subscriptions: Arc<SubscriptionTable>,
    pub dead_letters: DeadLetterForwarder,
    pub reporter: Arc<FailedOrderReporter>,
}

impl AppState {
    pub fn new(
        pubsub: Arc<PubSubConfig>,
        dead_letters: DeadLetterForwarder,
        reporter: FailedOrderReporter,
    ) -> Self {
        Self {
            subscriptions: Arc::new(SubscriptionTable::new(&pubsub)),
            pubsub,
            dead_letters,
            reporter: Arc::new(reporter),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
            )
        });

    let mut router = Router::new()
        .route("/weatherforecast", get(handlers::weather_forecast))
        .route("/dapr/subscribe", get(handlers::subscribe))
        .route("/health", get(handlers::health))
        .route("/alive", get(handlers::alive));

    for entry in state.subscriptions.entries() {
        router = match entry.handler {
            TopicHandler::Orders => router.route(entry.route, post(handlers::receive_order)),
            TopicHandler::FailedOrders => {
                router.route(entry.route, post(handlers::receive_failed_order))
            }
        };
    }

    router.layer(trace_layer).with_state(state)
}
