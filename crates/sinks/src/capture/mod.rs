//! Capture sink - keeps every received batch in memory
//!
//! Used by tests and by the `route` command to inspect what each sink would
//! have received. Failures can be scripted to exercise fan-out error paths.

use std::sync::Arc;

use parking_lot::Mutex;
use telroute_pipeline::{CallContext, Sink, SinkError, async_trait};
use telroute_protocol::{Logs, Metrics, ResourceBatch, Traces};

use crate::common::{MetricsSnapshot, SinkMetrics, SinkMetricsHandle};

/// Scripted failure mode
#[derive(Debug, Clone, Default)]
enum Failure {
    #[default]
    Never,
    /// Reject the next `n` batches, then recover
    Next(u32, String),
    /// Reject every batch
    Always(String),
}

/// In-memory sink storing batches per record kind
pub struct CaptureSink {
    name: Arc<str>,
    logs: Mutex<Vec<Logs>>,
    metrics_batches: Mutex<Vec<Metrics>>,
    traces: Mutex<Vec<Traces>>,
    failure: Mutex<Failure>,
    metrics: Arc<SinkMetrics>,
}

impl CaptureSink {
    /// Create an empty capture sink
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            logs: Mutex::new(Vec::new()),
            metrics_batches: Mutex::new(Vec::new()),
            traces: Mutex::new(Vec::new()),
            failure: Mutex::new(Failure::Never),
            metrics: Arc::new(SinkMetrics::new()),
        }
    }

    /// Reject the next `count` batches with `reason`
    pub fn fail_next(&self, count: u32, reason: impl Into<String>) {
        *self.failure.lock() = Failure::Next(count, reason.into());
    }

    /// Reject every batch with `reason` until `recover` is called
    pub fn fail_always(&self, reason: impl Into<String>) {
        *self.failure.lock() = Failure::Always(reason.into());
    }

    /// Stop failing
    pub fn recover(&self) {
        *self.failure.lock() = Failure::Never;
    }

    /// Get the sink name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Logs batches received so far
    pub fn logs(&self) -> Vec<Logs> {
        self.logs.lock().clone()
    }

    /// Metrics batches received so far
    pub fn metrics_batches(&self) -> Vec<Metrics> {
        self.metrics_batches.lock().clone()
    }

    /// Traces batches received so far
    pub fn traces(&self) -> Vec<Traces> {
        self.traces.lock().clone()
    }

    /// Remove and return the captured logs batches
    pub fn take_logs(&self) -> Vec<Logs> {
        std::mem::take(&mut *self.logs.lock())
    }

    /// Remove and return the captured metrics batches
    pub fn take_metrics(&self) -> Vec<Metrics> {
        std::mem::take(&mut *self.metrics_batches.lock())
    }

    /// Remove and return the captured traces batches
    pub fn take_traces(&self) -> Vec<Traces> {
        std::mem::take(&mut *self.traces.lock())
    }

    /// Total batches captured across all kinds
    pub fn batch_count(&self) -> usize {
        self.logs.lock().len() + self.metrics_batches.lock().len() + self.traces.lock().len()
    }

    /// Get a metrics handle for reporting
    pub fn metrics_handle(&self) -> SinkMetricsHandle {
        SinkMetricsHandle::new(Arc::clone(&self.name), "capture", Arc::clone(&self.metrics))
    }

    /// Get a snapshot of the metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Apply the failure script to one incoming batch
    fn admit(&self) -> Result<(), SinkError> {
        self.metrics.batch_received();

        let mut failure = self.failure.lock();
        let reason = match &mut *failure {
            Failure::Never => return Ok(()),
            Failure::Always(reason) => reason.clone(),
            Failure::Next(remaining, reason) => {
                let reason = reason.clone();
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    *failure = Failure::Never;
                }
                reason
            }
        };

        self.metrics.write_error();
        Err(SinkError::rejected(reason))
    }

    fn store<B: ResourceBatch>(&self, slot: &Mutex<Vec<B>>, batch: B) -> Result<(), SinkError> {
        self.admit()?;
        self.metrics.batch_written(batch.record_count() as u64, 0);
        slot.lock().push(batch);
        Ok(())
    }
}

#[async_trait]
impl Sink<Logs> for CaptureSink {
    async fn ingest(&self, _ctx: &CallContext, batch: Logs) -> Result<(), SinkError> {
        self.store(&self.logs, batch)
    }
}

#[async_trait]
impl Sink<Metrics> for CaptureSink {
    async fn ingest(&self, _ctx: &CallContext, batch: Metrics) -> Result<(), SinkError> {
        self.store(&self.metrics_batches, batch)
    }
}

#[async_trait]
impl Sink<Traces> for CaptureSink {
    async fn ingest(&self, _ctx: &CallContext, batch: Traces) -> Result<(), SinkError> {
        self.store(&self.traces, batch)
    }
}

impl std::fmt::Debug for CaptureSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSink")
            .field("name", &self.name)
            .field("batches", &self.batch_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "capture_test.rs"]
mod capture_test;
