//! # Worker Framework
//!
//! This crate provides the building blocks for running outbound side effects (publishes,
//! monitoring forwards, ...) on a **bounded background worker pool** instead of as
//! unawaited futures. It follows the same split as an actor system: a server half that
//! owns a channel receiver and a cheap, cloneable client half that owns the sender.
//!
//! ## Why a Pool Instead of `tokio::spawn`?
//!
//! A bare `tokio::spawn(async { publish(..).await })` per request has three problems:
//!
//! - **Unbounded**: a traffic spike spawns an unbounded number of outbound calls.
//! - **Unobserved**: nothing logs the result once the request that spawned it is gone.
//! - **Lost on exit**: nothing waits for it before the process shuts down.
//!
//! The pool fixes all three: a bounded queue with a drop-and-log policy when full, a
//! fixed concurrency budget, uniform outcome logging, and drain-on-shutdown.
//!
//! ## Architecture Overview
//!
//! 1. **Job Layer** ([`WorkerJob`]) - What to do, and with which shared context
//! 2. **Runtime Layer** ([`WorkerPool`]) - Queueing, concurrency and logging
//! 3. **Interface Layer** ([`WorkerClient`], [`JobClient`]) - Type-safe submission
//!
//! ```rust
//! use worker_framework::{WorkerJob, WorkerPool};
//! use async_trait::async_trait;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct Add(u32);
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("add failed")]
//! struct AddError;
//!
//! #[async_trait]
//! impl WorkerJob for Add {
//!     type Output = u32;
//!     type Context = Arc<AtomicU32>;
//!     type Error = AddError;
//!
//!     fn kind(&self) -> &'static str { "add" }
//!
//!     async fn execute(self, total: &Arc<AtomicU32>) -> Result<u32, AddError> {
//!         Ok(total.fetch_add(self.0, Ordering::SeqCst) + self.0)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let total = Arc::new(AtomicU32::new(0));
//!     let (pool, client) = WorkerPool::<Add>::new(16, 4);
//!     let handle = tokio::spawn(pool.run(total.clone()));
//!
//!     // Fire-and-forget: returns immediately.
//!     client.submit(Add(1)).unwrap();
//!     // Request/response: waits for the job.
//!     let _ = client.call(Add(2)).await.unwrap();
//!
//!     // Dropping the last client closes the queue; the pool drains and exits.
//!     drop(client);
//!     handle.await.unwrap();
//!     assert_eq!(total.load(Ordering::SeqCst), 3);
//! }
//! ```
//!
//! ## Context Injection Pattern
//!
//! Dependencies are injected at **runtime** via `run(context)`, not at construction
//! time. The job types stay plain data and the HTTP client, config and credentials
//! live in one shared context.
//!
//! ## Testing
//!
//! The [`mock`] module provides `MockClient` and `create_mock_client` so code that
//! submits jobs can be tested without executing them.

pub mod client;
pub mod client_trait;
pub mod error;
pub mod job;
pub mod message;
pub mod mock;
pub mod tracing;
pub mod worker;

// Re-export core types for convenience
pub use client::WorkerClient;
pub use client_trait::JobClient;
pub use error::FrameworkError;
pub use job::WorkerJob;
pub use message::{JobRequest, Response};
pub use worker::WorkerPool;
