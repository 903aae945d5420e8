//! telroute Protocol - core record types for the routing pipeline
//!
//! This crate provides the types that flow through the router:
//! - `Logs`, `Metrics`, `Traces` - OTLP-shaped batches of resource groups
//! - `Attributes` - insertion-ordered attribute sets
//! - `ResourceBatch` / `ResourceGroup` - the capabilities the router needs
//!   from every record kind (iterate groups, reach resource attributes,
//!   rebuild a batch from groups)
//! - `CallContext` - per-call metadata, cancellation and deadline
//! - `SignalKind` - logs, metrics or traces
//!
//! # Design Principles
//!
//! - **Owned groups**: splitting a batch moves whole resource groups; a
//!   forwarded batch owns its attribute sets and can be mutated freely
//! - **One algorithm, three kinds**: routing is written against
//!   `ResourceBatch` and instantiated per kind

mod attributes;
mod batch;
mod context;
mod error;
mod logs;
mod metrics;
mod schema;
mod traces;

pub use attributes::{AttributeValue, Attributes, KeyValue};
pub use batch::{InstrumentationScope, Resource, ResourceBatch, ResourceGroup};
pub use context::CallContext;
pub use error::ProtocolError;
pub use logs::{LogRecord, Logs, ResourceLogs, ScopeLogs};
pub use metrics::{Metric, MetricType, Metrics, NumberDataPoint, ResourceMetrics, ScopeMetrics};
pub use schema::SignalKind;
pub use traces::{ResourceSpans, ScopeSpans, Span, Traces};

// Re-export the cancellation token so callers don't need tokio-util directly
pub use tokio_util::sync::CancellationToken;

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;
