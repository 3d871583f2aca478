//! # App Host
//!
//! Orchestrates the sample locally: builds the [application model](resources) for the
//! order API and the web frontend, attaches a sidecar and the telemetry export
//! settings to each, then either prints that model or runs it under `dapr run`.

pub mod host;
pub mod launcher;
pub mod resources;
pub mod telemetry;
