//! Stdout Sink - JSON line debug output
//!
//! Writes one JSON object per received batch. Not intended for production
//! use at high throughput; every write takes a lock on the output.
//!
//! # Example Output
//!
//! ```text
//! {"sink":"otlp/acme","kind":"logs","groups":1,"records":2,"batch":{"resourceLogs":[...]}}
//! {"sink":"otlp","kind":"traces","groups":3,"records":40}
//! ```
//!
//! The second line is what `summary_only` produces.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use telroute_config::StdoutSinkConfig;
use telroute_pipeline::{CallContext, Sink, SinkError, async_trait};
use telroute_protocol::{ResourceBatch, SignalKind};

use crate::common::{MetricsSnapshot, SinkMetrics, SinkMetricsHandle};

/// Configuration for stdout sink
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutConfig {
    /// Pretty-print each batch over several lines
    pub pretty: bool,

    /// Only write the summary fields, not the batch itself
    pub summary_only: bool,
}

impl StdoutConfig {
    /// Create config with pretty printing enabled
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }

    /// Create config that writes summaries only
    pub fn summary_only() -> Self {
        Self {
            summary_only: true,
            ..Self::default()
        }
    }
}

impl From<&StdoutSinkConfig> for StdoutConfig {
    fn from(config: &StdoutSinkConfig) -> Self {
        Self {
            pretty: config.pretty,
            summary_only: config.summary_only,
        }
    }
}

/// One output line
#[derive(Serialize)]
struct Line<'a, B> {
    sink: &'a str,
    kind: SignalKind,
    groups: usize,
    records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    batch: Option<&'a B>,
}

/// Stdout sink for debug output
pub struct StdoutSink {
    /// Sink name, written into every line
    name: Arc<str>,

    /// Configuration
    config: StdoutConfig,

    /// Output target (stdout unless replaced)
    writer: Mutex<Box<dyn Write + Send>>,

    /// Metrics (Arc for sharing with metrics handle)
    metrics: Arc<SinkMetrics>,
}

impl StdoutSink {
    /// Create a stdout sink with default config
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self::with_config(name, StdoutConfig::default())
    }

    /// Create a stdout sink with custom config
    pub fn with_config(name: impl Into<Arc<str>>, config: StdoutConfig) -> Self {
        Self::with_writer(name, config, io::stdout())
    }

    /// Create a sink writing to any `Write` target
    pub fn with_writer(
        name: impl Into<Arc<str>>,
        config: StdoutConfig,
        writer: impl Write + Send + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            writer: Mutex::new(Box::new(writer)),
            metrics: Arc::new(SinkMetrics::new()),
        }
    }

    /// Get the sink name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the output configuration
    #[inline]
    pub fn config(&self) -> StdoutConfig {
        self.config
    }

    /// Get reference to metrics
    #[inline]
    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }

    /// Get a metrics handle for reporting
    pub fn metrics_handle(&self) -> SinkMetricsHandle {
        SinkMetricsHandle::new(Arc::clone(&self.name), "stdout", Arc::clone(&self.metrics))
    }

    /// Get a snapshot of the metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Serialize one batch into a newline-terminated buffer
    fn render<B: ResourceBatch + Serialize>(&self, batch: &B) -> Result<Vec<u8>, SinkError> {
        let line = Line {
            sink: &self.name,
            kind: B::KIND,
            groups: batch.group_count(),
            records: batch.record_count(),
            batch: (!self.config.summary_only).then_some(batch),
        };

        let mut buf = if self.config.pretty {
            serde_json::to_vec_pretty(&line)
        } else {
            serde_json::to_vec(&line)
        }
        .map_err(|e| SinkError::write(format!("failed to serialize batch: {e}")))?;
        buf.push(b'\n');
        Ok(buf)
    }
}

#[async_trait]
impl<B: ResourceBatch + Serialize> Sink<B> for StdoutSink {
    async fn ingest(&self, _ctx: &CallContext, batch: B) -> Result<(), SinkError> {
        self.metrics.batch_received();

        let buf = match self.render(&batch) {
            Ok(buf) => buf,
            Err(e) => {
                self.metrics.write_error();
                return Err(e);
            }
        };

        let result = {
            let mut writer = self.writer.lock();
            writer.write_all(&buf).and_then(|()| writer.flush())
        };

        match result {
            Ok(()) => {
                self.metrics
                    .batch_written(batch.record_count() as u64, buf.len() as u64);
                Ok(())
            }
            Err(e) => {
                self.metrics.write_error();
                tracing::debug!(sink = %self.name, error = %e, "stdout write failed");
                Err(SinkError::Io(e))
            }
        }
    }
}

impl std::fmt::Debug for StdoutSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdoutSink")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "stdout_test.rs"]
mod stdout_test;
