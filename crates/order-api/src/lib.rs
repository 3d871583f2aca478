//! # Order API Library
//!
//! The order service behind the sidecar: a synthetic weather forecast plus the
//! pub/sub endpoints that ingest orders, dead-letter simulated failures and report
//! them to monitoring.
//!
//! - **[model]**: Wire types ([`Order`](model::Order), [`WeatherForecast`](model::WeatherForecast), ...).
//! - **[ingestion]**: The order policy and its outcomes.
//! - **[sidecar]** / **[dead_letter]**: Publishing through the sidecar on the background pool.
//! - **[monitoring]** / **[failed_orders]**: Failure events for the monitoring backend.
//! - **[app]**: Router and handler state. **[lifecycle]**: Startup and graceful shutdown.
//!
//! The web frontend reuses [`config`], [`model`] and [`sidecar`].

pub mod app;
pub mod config;
pub mod dead_letter;
pub mod error;
pub mod failed_orders;
pub mod handlers;
pub mod ingestion;
pub mod lifecycle;
pub mod model;
pub mod monitoring;
pub mod sidecar;
pub mod subscriptions;
pub mod weather;
