//! Factory Metrics
//!
//! Per-factory counters for registrations and lookup outcomes.
//!
//! Uses atomic counters so clones of a factory can share one collector.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Metrics collector owned by a [`MetadataFactory`](crate::MetadataFactory)
#[derive(Debug)]
pub struct FactoryMetrics {
    /// Successful registrations
    pub registrations: AtomicU64,
    /// Successful unregistrations
    pub unregistrations: AtomicU64,
    /// Lookups dispatched to a registered reader that succeeded
    pub resolved: AtomicU64,
    /// Lookups that fell back to raw metadata
    pub unresolved: AtomicU64,
    /// Lookups whose registered reader returned an error
    pub failed: AtomicU64,
    start_time: Instant,
}

impl FactoryMetrics {
    pub fn new() -> Self {
        Self {
            registrations: AtomicU64::new(0),
            unregistrations: AtomicU64::new(0),
            resolved: AtomicU64::new(0),
            unresolved: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn registration(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn unregistration(&self) {
        self.unregistrations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn resolved(&self) {
        self.resolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn unresolved(&self) {
        self.unresolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            registrations: self.registrations.load(Ordering::Relaxed),
            unregistrations: self.unregistrations.load(Ordering::Relaxed),
            resolved: self.resolved.load(Ordering::Relaxed),
            unresolved: self.unresolved.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            registrations = snapshot.registrations,
            unregistrations = snapshot.unregistrations,
            resolved = snapshot.resolved,
            unresolved = snapshot.unresolved,
            failed = snapshot.failed,
            uptime_seconds = snapshot.uptime_seconds,
            "Metadata factory metrics snapshot"
        );
    }
}

impl Default for FactoryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub registrations: u64,
    pub unregistrations: u64,
    pub resolved: u64,
    pub unresolved: u64,
    pub failed: u64,
    pub uptime_seconds: u64,
}

impl MetricsSnapshot {
    /// Total lookups through `create_metadata`
    pub fn lookups(&self) -> u64 {
        self.resolved + self.unresolved + self.failed
    }
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
    }
}
