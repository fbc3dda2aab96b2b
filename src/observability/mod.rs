//! Observability module for monitoring and metrics.
//!
//! Counters for search and indexing passes plus a small timing helper;
//! both report through `tracing`.

pub mod metrics;

pub use metrics::{MetricsTracker, PassOutcome, Timer};
