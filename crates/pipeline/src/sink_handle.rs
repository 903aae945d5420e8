//! Sink trait and sink handle
//!
//! `Sink<B>` is the downstream consumer contract: it accepts a batch of one
//! record kind together with the call context. `SinkHandle` pairs a resolved
//! sink with its routing id and name so the processor can dispatch without
//! knowing concrete sink types.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use telroute_protocol::CallContext;
use telroute_routing::SinkId;

use crate::error::SinkError;

/// A downstream consumer of batches of kind `B`
///
/// A sink type that accepts several record kinds implements `Sink<B>` once
/// per kind.
#[async_trait]
pub trait Sink<B>: Send + Sync {
    /// Deliver one batch
    ///
    /// The context is the caller's: sinks may observe its cancellation token
    /// or deadline themselves.
    async fn ingest(&self, ctx: &CallContext, batch: B) -> Result<(), SinkError>;
}

/// Handle to a resolved sink
///
/// # Design
///
/// - Uses `telroute_routing::SinkId` (u16) for O(1) array indexing
/// - Stores sink name for debugging/logging and failure reports
/// - Wraps `Arc<dyn Sink<B>>` so one sink instance can back several handles
pub struct SinkHandle<B> {
    /// Identifier for this sink (index into the processor's handles)
    id: SinkId,

    /// Configured name for debugging/metrics
    name: Arc<str>,

    /// The sink itself
    sink: Arc<dyn Sink<B>>,
}

impl<B> SinkHandle<B> {
    /// Create a new sink handle
    #[inline]
    pub fn new(id: SinkId, name: impl Into<Arc<str>>, sink: Arc<dyn Sink<B>>) -> Self {
        Self {
            id,
            name: name.into(),
            sink,
        }
    }

    /// Get the sink's identifier
    #[inline]
    pub fn id(&self) -> SinkId {
        self.id
    }

    /// Get the sink's name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Deliver a batch to the sink
    #[inline]
    pub async fn ingest(&self, ctx: &CallContext, batch: B) -> Result<(), SinkError> {
        self.sink.ingest(ctx, batch).await
    }
}

impl<B> Clone for SinkHandle<B> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: Arc::clone(&self.name),
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<B> fmt::Debug for SinkHandle<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use telroute_protocol::{Attributes, LogRecord, Logs, ResourceLogs};

    #[derive(Default)]
    struct CountingSink {
        records: AtomicUsize,
    }

    #[async_trait]
    impl Sink<Logs> for CountingSink {
        async fn ingest(&self, _ctx: &CallContext, batch: Logs) -> Result<(), SinkError> {
            use telroute_protocol::ResourceBatch;
            self.records.fetch_add(batch.record_count(), Ordering::Relaxed);
            Ok(())
        }
    }

    #[test]
    fn test_sink_handle_creation() {
        let handle: SinkHandle<Logs> =
            SinkHandle::new(SinkId::new(5), "otlp", Arc::new(CountingSink::default()));

        assert_eq!(handle.id(), SinkId::new(5));
        assert_eq!(handle.name(), "otlp");
    }

    #[test]
    fn test_sink_handle_debug() {
        let handle: SinkHandle<Logs> =
            SinkHandle::new(SinkId::new(1), "debug_sink", Arc::new(CountingSink::default()));

        let debug = format!("{:?}", handle);
        assert!(debug.contains("debug_sink"));
        assert!(debug.contains("SinkHandle"));
    }

    #[tokio::test]
    async fn test_clones_share_sink() {
        let sink = Arc::new(CountingSink::default());
        let handle: SinkHandle<Logs> = SinkHandle::new(SinkId::new(0), "otlp", sink.clone());
        let copy = handle.clone();

        let mut batch = Logs::new();
        batch.push(ResourceLogs::new(Attributes::new()).with_record(LogRecord::new("hello")));

        handle.ingest(&CallContext::new(), batch.clone()).await.unwrap();
        copy.ingest(&CallContext::new(), batch).await.unwrap();

        assert_eq!(sink.records.load(Ordering::Relaxed), 2);
    }
}
