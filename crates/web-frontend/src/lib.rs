//! # Web Frontend
//!
//! Thin client of the order API. It never calls the API directly: forecasts come
//! through the sidecar's service invocation and orders leave as pub/sub messages.

pub mod app;
pub mod config;
pub mod lifecycle;
pub mod weather_client;
