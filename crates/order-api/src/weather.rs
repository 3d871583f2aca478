//! # Weather Generator
//!
//! Produces a five-day synthetic forecast starting tomorrow. The random source and the
//! reference date are parameters, so the handler passes the thread RNG and today's
//! local date while tests pass a seeded RNG and a fixed date.

use crate::model::WeatherForecast;
use chrono::{Days, NaiveDate};
use rand::Rng;

pub const FORECAST_DAYS: u64 = 5;

/// Lowest generated temperature in °C (inclusive).
pub const MIN_TEMPERATURE_C: i32 = -20;
/// Highest generated temperature in °C (exclusive).
pub const MAX_TEMPERATURE_C: i32 = 55;

pub const SUMMARIES: [&str; 10] = [
    "Freezing",
    "Bracing",
    "Chilly",
    "Cool",
    "Mild",
    "Warm",
    "Balmy",
    "Hot",
    "Sweltering",
    "Scorching",
];

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum WeatherError {
    #[error("forecast date {days} days after {today} is out of range")]
    DateOutOfRange { today: NaiveDate, days: u64 },
}

/// Generates [`FORECAST_DAYS`] forecasts for the days after `today`.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    today: NaiveDate,
) -> Result<Vec<WeatherForecast>, WeatherError> {
    (1..=FORECAST_DAYS)
        .map(|days| {
            let date = today
                .checked_add_days(Days::new(days))
                .ok_or(WeatherError::DateOutOfRange { today, days })?;
            let temperature_c = rng.random_range(MIN_TEMPERATURE_C..MAX_TEMPERATURE_C);
            let summary = SUMMARIES[rng.random_range(0..SUMMARIES.len())];
            Ok(WeatherForecast::new(date, temperature_c, summary))
        })
        .collect()
}
