//! Host environment and sink registry
//!
//! The processor resolves sink names against a `Host` once, at start. The
//! host knows every sink by name and which record kinds each one accepts.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use telroute_protocol::{Logs, Metrics, ResourceBatch, SignalKind, Traces};

use crate::sink_handle::Sink;

/// Shared, type-erased sink of one record kind
pub type DynSink<B> = Arc<dyn Sink<B>>;

/// Sink lookup provided by the hosting environment
pub trait Host: Send + Sync {
    /// Find a sink accepting logs
    fn lookup_logs_sink(&self, name: &str) -> Option<DynSink<Logs>>;

    /// Find a sink accepting metrics
    fn lookup_metrics_sink(&self, name: &str) -> Option<DynSink<Metrics>>;

    /// Find a sink accepting traces
    fn lookup_traces_sink(&self, name: &str) -> Option<DynSink<Traces>>;

    /// Check if a sink with this name exists, whatever kinds it accepts
    fn has_sink(&self, name: &str) -> bool;
}

/// A record kind the routing processor can handle
///
/// Adds per-kind sink lookup on top of `ResourceBatch`.
pub trait Signal: ResourceBatch {
    /// Look up a sink of this kind in the host
    fn lookup_sink(host: &dyn Host, name: &str) -> Option<DynSink<Self>>;
}

impl Signal for Logs {
    #[inline]
    fn lookup_sink(host: &dyn Host, name: &str) -> Option<DynSink<Self>> {
        host.lookup_logs_sink(name)
    }
}

impl Signal for Metrics {
    #[inline]
    fn lookup_sink(host: &dyn Host, name: &str) -> Option<DynSink<Self>> {
        host.lookup_metrics_sink(name)
    }
}

impl Signal for Traces {
    #[inline]
    fn lookup_sink(host: &dyn Host, name: &str) -> Option<DynSink<Self>> {
        host.lookup_traces_sink(name)
    }
}

/// In-process `Host` implementation
///
/// Sinks are registered per record kind under a name. Registering the same
/// name again for the same kind replaces the earlier sink.
///
/// # Example
///
/// ```ignore
/// let mut registry = SinkRegistry::new();
/// let sink = Arc::new(NullSink::new());
/// registry.register_all("otlp", sink.clone());
/// registry.register_logs("otlp/logs", sink);
/// ```
#[derive(Default, Clone)]
pub struct SinkRegistry {
    logs: HashMap<String, DynSink<Logs>>,
    metrics: HashMap<String, DynSink<Metrics>>,
    traces: HashMap<String, DynSink<Traces>>,
}

impl SinkRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a logs sink
    pub fn register_logs(&mut self, name: impl Into<String>, sink: DynSink<Logs>) {
        self.logs.insert(name.into(), sink);
    }

    /// Register a metrics sink
    pub fn register_metrics(&mut self, name: impl Into<String>, sink: DynSink<Metrics>) {
        self.metrics.insert(name.into(), sink);
    }

    /// Register a traces sink
    pub fn register_traces(&mut self, name: impl Into<String>, sink: DynSink<Traces>) {
        self.traces.insert(name.into(), sink);
    }

    /// Register one sink for the given record kinds
    pub fn register<S>(&mut self, name: impl Into<String>, sink: Arc<S>, kinds: &[SignalKind])
    where
        S: Sink<Logs> + Sink<Metrics> + Sink<Traces> + 'static,
    {
        let name = name.into();
        for kind in kinds {
            match kind {
                SignalKind::Logs => self.register_logs(name.clone(), sink.clone()),
                SignalKind::Metrics => self.register_metrics(name.clone(), sink.clone()),
                SignalKind::Traces => self.register_traces(name.clone(), sink.clone()),
            }
        }
    }

    /// Register one sink for every record kind
    pub fn register_all<S>(&mut self, name: impl Into<String>, sink: Arc<S>)
    where
        S: Sink<Logs> + Sink<Metrics> + Sink<Traces> + 'static,
    {
        self.register(name, sink, &SignalKind::ALL);
    }

    /// Record kinds a sink is registered for
    pub fn kinds(&self, name: &str) -> Vec<SignalKind> {
        let mut kinds = Vec::new();
        if self.logs.contains_key(name) {
            kinds.push(SignalKind::Logs);
        }
        if self.metrics.contains_key(name) {
            kinds.push(SignalKind::Metrics);
        }
        if self.traces.contains_key(name) {
            kinds.push(SignalKind::Traces);
        }
        kinds
    }

    /// All registered sink names, sorted and deduplicated
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .logs
            .keys()
            .chain(self.metrics.keys())
            .chain(self.traces.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty() && self.metrics.is_empty() && self.traces.is_empty()
    }
}

impl Host for SinkRegistry {
    fn lookup_logs_sink(&self, name: &str) -> Option<DynSink<Logs>> {
        self.logs.get(name).cloned()
    }

    fn lookup_metrics_sink(&self, name: &str) -> Option<DynSink<Metrics>> {
        self.metrics.get(name).cloned()
    }

    fn lookup_traces_sink(&self, name: &str) -> Option<DynSink<Traces>> {
        self.traces.get(name).cloned()
    }

    fn has_sink(&self, name: &str) -> bool {
        self.logs.contains_key(name)
            || self.metrics.contains_key(name)
            || self.traces.contains_key(name)
    }
}

impl fmt::Debug for SinkRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkRegistry")
            .field("names", &self.names())
            .finish()
    }
}
