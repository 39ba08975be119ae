//! # Utility Modules
//!
//! Supporting utilities for logging, metrics, and ordering.
//!
//! ## Components
//! - **Logging**: tracing subscriber setup from `LoggingConfig`
//! - **Metrics**: per-factory lookup counters
//! - **Sort**: sorting by a projected member

pub mod logging;
pub mod metrics;
pub mod sort;

pub use metrics::{FactoryMetrics, MetricsSnapshot};
