//! Common types and utilities for sinks
//!
//! Shared counters used by every sink type.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics shared by all sink types
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Total batches handed to the sink
    batches_received: AtomicU64,

    /// Total batches successfully written
    batches_written: AtomicU64,

    /// Total records written (log records, data points, spans)
    records_written: AtomicU64,

    /// Total bytes written (0 for sinks that don't serialize)
    bytes_written: AtomicU64,

    /// Write errors encountered
    write_errors: AtomicU64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            batches_received: AtomicU64::new(0),
            batches_written: AtomicU64::new(0),
            records_written: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
        }
    }

    /// Record a received batch
    #[inline]
    pub fn batch_received(&self) {
        self.batches_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successfully written batch
    #[inline]
    pub fn batch_written(&self, record_count: u64, bytes: u64) {
        self.batches_written.fetch_add(1, Ordering::Relaxed);
        self.records_written
            .fetch_add(record_count, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a write error
    #[inline]
    pub fn write_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches_received: self.batches_received.load(Ordering::Relaxed),
            batches_written: self.batches_written.load(Ordering::Relaxed),
            records_written: self.records_written.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.batches_received.store(0, Ordering::Relaxed);
        self.batches_written.store(0, Ordering::Relaxed);
        self.records_written.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
        self.write_errors.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time snapshot of sink metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub batches_received: u64,
    pub batches_written: u64,
    pub records_written: u64,
    pub bytes_written: u64,
    pub write_errors: u64,
}

/// Handle for reading a sink's metrics
///
/// Holds an Arc to the counters, so it stays valid after the sink itself is
/// dropped by the registry.
#[derive(Debug, Clone)]
pub struct SinkMetricsHandle {
    name: Arc<str>,
    sink_type: &'static str,
    metrics: Arc<SinkMetrics>,
}

impl SinkMetricsHandle {
    pub(crate) fn new(name: Arc<str>, sink_type: &'static str, metrics: Arc<SinkMetrics>) -> Self {
        Self {
            name,
            sink_type,
            metrics,
        }
    }

    /// Sink instance name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sink type (`null`, `stdout`, `capture`)
    pub fn sink_type(&self) -> &'static str {
        self.sink_type
    }

    /// Current metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod common_test;
