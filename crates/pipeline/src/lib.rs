//! telroute Pipeline - the routing processor
//!
//! Routes batches of logs, metrics or traces to named sinks by the value of
//! one attribute.
//!
//! # Architecture
//!
//! ```text
//!                     [RoutingProcessor<B>]                          [Sinks]
//!                                                                ┌──→ otlp/acme
//!  batch + ctx ──→ extract key ──→ RoutingTable ──→ split/merge ──┼──→ otlp
//!                  (context or       O(1)          (per dest.)    └──→ debug
//!                   resource)
//! ```
//!
//! # Key Design
//!
//! - **Pre-compiled routing**: `RoutingTable` lookup is O(1), no allocation
//! - **O(1) sink lookup**: Handles stored in `Vec` indexed by `SinkId` (u16)
//! - **Resolve once**: Sink names are resolved through the `Host` at start
//! - **One algorithm, three kinds**: `RoutingProcessor<B: Signal>` is
//!   instantiated for `Logs`, `Metrics` and `Traces`
//! - **Collect-all failures**: a failing sink never stops delivery to others
//!
//! # Example
//!
//! ```ignore
//! use telroute_pipeline::{RoutingProcessor, SinkRegistry};
//!
//! let mut registry = SinkRegistry::new();
//! registry.register_all("otlp", Arc::new(NullSink::new()));
//!
//! let config = RoutingConfig::new("X-Tenant").with_default(["otlp"]);
//! let mut processor = RoutingProcessor::<Logs>::new(config)?;
//! processor.start(&registry)?;
//!
//! processor.consume(&CallContext::new(), logs).await?;
//! ```

mod error;
mod host;
mod metrics;
mod router;
mod sink_handle;

pub use error::{DispatchError, PipelineError, Result, SinkError, SinkFailure};
pub use host::{DynSink, Host, Signal, SinkRegistry};
pub use metrics::{MetricsSnapshot, RouterMetrics, RouterMetricsHandle};
pub use router::{Capabilities, RoutingProcessor};
pub use sink_handle::{Sink, SinkHandle};

// Re-export key types from dependencies for convenience
pub use async_trait::async_trait;
pub use telroute_protocol::{CallContext, Logs, Metrics, Traces};
pub use telroute_routing::{RoutingTable, SinkId};

/// Routing processor for logs
pub type LogsRouter = RoutingProcessor<Logs>;

/// Routing processor for metrics
pub type MetricsRouter = RoutingProcessor<Metrics>;

/// Routing processor for traces
pub type TracesRouter = RoutingProcessor<Traces>;
