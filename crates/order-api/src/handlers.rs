//! Request handlers of the order API.
use crate::app::AppState;
use crate::error::{ApiError, OrderError};
use crate::ingestion::{IngestOutcome, OrderIngestion};
use crate::model::{ForecastStats, Order, Subscription, TopicEvent, WeatherForecast};
use crate::weather;
use axum::extract::State;
use axum::Json;
use tracing::{error, field, info, instrument, Span};

/// `GET /weatherforecast`. Generation errors are logged and answered with `[]`.
#[instrument(skip_all, fields(
    amount_weather_forecasts = field::Empty,
    avg_temperature_c = field::Empty,
    avg_temperature_f = field::Empty,
))]
pub async fn weather_forecast() -> Json<Vec<WeatherForecast>> {
    info!("Receiving request for weather forecast");
    let today = chrono::Local::now().date_naive();
    match weather::generate(&mut rand::rng(), today) {
        Ok(forecasts) => {
            let stats = ForecastStats::of(&forecasts);
            let span = Span::current();
            span.record("amount_weather_forecasts", stats.count);
            span.record("avg_temperature_c", stats.avg_temperature_c);
            span.record("avg_temperature_f", stats.avg_temperature_f);
            info!(
                "The average temperature in the next {} days is {} C or {} F",
                stats.count, stats.avg_temperature_c, stats.avg_temperature_f
            );
            Json(forecasts)
        }
        Err(e) => {
            error!(error = %e, "Weather forecast generation failed");
            Json(Vec::new())
        }
    }
}

/// `GET /dapr/subscribe`.
pub async fn subscribe(State(state): State<AppState>) -> Json<Vec<Subscription>> {
    Json(state.subscriptions.descriptors())
}

/// `POST /orders`. A failing order is dead-lettered, then answered with 500.
#[instrument(skip_all, fields(order_id = field::Empty))]
pub async fn receive_order(
    State(state): State<AppState>,
    Json(event): Json<TopicEvent<Order>>,
) -> Result<Json<Order>, ApiError> {
    Span::current().record("order_id", event.data.order_id);
    info!(
        order_id = event.data.order_id,
        customer_id = ?event.data.customer_id,
        event_id = ?event.id,
        "Order received"
    );

    match OrderIngestion::handle(event.data).await {
        IngestOutcome::Completed(order) => Ok(Json(order)),
        IngestOutcome::Failed(letter) => {
            if let Err(e) = state.dead_letters.forward(&letter) {
                error!(order_id = letter.order.order_id, error = %e, "Dead letter not forwarded");
            }
            Err(OrderError::SimulatedFailure {
                order_id: letter.order.order_id,
            }
            .into())
        }
    }
}

/// `POST /failedOrders`. Always 200 with the received order.
#[instrument(skip_all, fields(order_id = field::Empty))]
pub async fn receive_failed_order(
    State(state): State<AppState>,
    Json(event): Json<TopicEvent<Order>>,
) -> Json<Order> {
    Span::current().record("order_id", event.data.order_id);
    info!(order_id = event.data.order_id, "Failed order received");
    Json(state.reporter.report(event.data).await)
}

pub async fn health() -> &'static str {
    "Healthy"
}

pub async fn alive() -> &'static str {
    "Healthy"
}
