//! Null sink - discards all data
//!
//! Receives batches of any record kind, updates metrics, and drops them.
//!
//! # Use Cases
//!
//! - **Benchmarking**: Measure routing throughput without sink bottlenecks
//! - **Testing**: Validate routing configuration
//! - **Dropping on purpose**: route a tenant to `null` to discard its data
//!   while still counting it

use std::sync::Arc;

use telroute_pipeline::{CallContext, Sink, SinkError, async_trait};
use telroute_protocol::ResourceBatch;

use crate::common::{MetricsSnapshot, SinkMetrics, SinkMetricsHandle};

/// Null sink that discards all received batches
pub struct NullSink {
    /// Sink instance name
    name: Arc<str>,

    /// Metrics for this sink (Arc for sharing with metrics handle)
    metrics: Arc<SinkMetrics>,
}

impl NullSink {
    /// Create a new null sink named `null`
    pub fn new() -> Self {
        Self::with_name("null")
    }

    /// Create a new null sink with a custom name
    pub fn with_name(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            metrics: Arc::new(SinkMetrics::new()),
        }
    }

    /// Get the sink name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get reference to metrics
    #[inline]
    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }

    /// Get a metrics handle for reporting
    pub fn metrics_handle(&self) -> SinkMetricsHandle {
        SinkMetricsHandle::new(Arc::clone(&self.name), "null", Arc::clone(&self.metrics))
    }

    /// Get a snapshot of the metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl Default for NullSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<B: ResourceBatch> Sink<B> for NullSink {
    async fn ingest(&self, _ctx: &CallContext, batch: B) -> Result<(), SinkError> {
        self.metrics.batch_received();
        // "received" is effectively "written" since we discard immediately
        self.metrics.batch_written(batch.record_count() as u64, 0);
        Ok(())
    }
}

impl std::fmt::Debug for NullSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NullSink")
            .field("name", &self.name)
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}

#[cfg(test)]
#[path = "null_test.rs"]
mod null_test;
