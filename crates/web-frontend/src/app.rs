//! Frontend HTTP surface.
//!
//! | Route | Behaviour |
//! |-------|-----------|
//! | `GET /weather` | Forecasts from the order API, 502 when it cannot be reached |
//! | `POST /orders` | Publishes an order, ids are random unless given |
//! | `GET /health` | Liveness |
use crate::weather_client::WeatherApiClient;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use order_api::error::ApiError;
use order_api::model::{Order, WeatherForecast};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub const CUSTOMER_ID_RANGE: RangeInclusive<i64> = 1..=1000;
pub const ORDER_ID_RANGE: RangeInclusive<i64> = 1..=100;

#[derive(Clone)]
pub struct FrontendState {
    pub weather: Arc<WeatherApiClient>,
}

/// Optional body of `POST /orders`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_id: Option<i64>,
    pub order_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderSubmission {
    pub submitted: bool,
    pub order: Order,
}

pub fn build_router(state: FrontendState) -> Router {
    Router::new()
        .route("/weather", get(weather))
        .route("/orders", post(submit_order))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn weather(State(state): State<FrontendState>) -> Result<Json<Vec<WeatherForecast>>, ApiError> {
    match state.weather.get_weather().await {
        Ok(forecasts) => Ok(Json(forecasts)),
        Err(e) => {
            warn!(error = %e, "Weather unavailable");
            Err(ApiError::new(
                StatusCode::BAD_GATEWAY,
                "weather_unavailable",
                e.to_string(),
            ))
        }
    }
}

async fn submit_order(State(state): State<FrontendState>, body: Bytes) -> Response {
    let request = if body.is_empty() {
        OrderRequest::default()
    } else {
        match serde_json::from_slice::<OrderRequest>(&body) {
            Ok(request) => request,
            Err(e) => {
                return ApiError::new(StatusCode::BAD_REQUEST, "validation_error", e.to_string())
                    .into_response();
            }
        }
    };

    let order = {
        let mut rng = rand::rng();
        Order::new(
            Some(
                request
                    .customer_id
                    .unwrap_or_else(|| rng.random_range(CUSTOMER_ID_RANGE)),
            ),
            request
                .order_id
                .unwrap_or_else(|| rng.random_range(ORDER_ID_RANGE)),
        )
    };
    let customer_id = order.customer_id.unwrap_or_default();

    let submitted = state
        .weather
        .submit_order(customer_id, order.order_id)
        .await;
    info!(%order, submitted, "Order submission finished");
    Json(OrderSubmission { submitted, order }).into_response()
}

async fn health() -> &'static str {
    "Healthy"
}
