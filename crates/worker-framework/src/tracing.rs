//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging for a binary, once, at startup.
//!
//! ## Configuration
//!
//! - **Structured logging** with the `tracing` crate
//! - **Configurable log levels** via the `RUST_LOG` environment variable (default `info`)
//! - **Compact format** that hides the module prefix (`with_target(false)`)
//!
//! ## What Gets Traced
//!
//! - **Pool lifecycle**: startup (with concurrency), drain and shutdown (with job count)
//! - **Jobs**: every Fire/Call at `debug` with the full job, outcome at `info`/`warn`
//! - **Requests**: HTTP spans from the services carry fields such as `order_id`
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run -p order-api
//!
//! # Show full job payloads
//! RUST_LOG=debug cargo run -p order-api
//!
//! # Filter to specific modules
//! RUST_LOG=worker_framework=debug,order_api=info cargo run -p order-api
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Calling it twice panics, so only `main` should.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false) // Don't show module paths - fields carry the context
        .compact()
        .init();
}
