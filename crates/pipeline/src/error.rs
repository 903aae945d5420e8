//! Pipeline error types
//!
//! Error types for the routing processor lifecycle, sink delivery and
//! fan-out failure aggregation.

use std::fmt;
use std::io;

use thiserror::Error;

use telroute_config::ConfigError;
use telroute_protocol::SignalKind;
use telroute_routing::RoutingError;

/// Errors returned by a sink's `ingest`
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink refused the batch
    #[error("batch rejected: {0}")]
    Rejected(String),

    /// The sink has been shut down
    #[error("sink is closed")]
    Closed,

    /// Writing the batch failed
    #[error("write failed: {0}")]
    Write(String),

    /// I/O failure in the sink
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl SinkError {
    /// Create a Rejected error
    #[inline]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    /// Create a Write error
    #[inline]
    pub fn write(reason: impl Into<String>) -> Self {
        Self::Write(reason.into())
    }
}

/// One failed delivery to one sink
#[derive(Debug)]
pub struct SinkFailure {
    /// Name of the sink that failed
    pub sink: String,
    /// Error returned by the sink
    pub error: SinkError,
}

/// Aggregated delivery failures of one `consume` call
///
/// Every sink is attempted; all failures are collected here.
#[derive(Debug)]
pub struct DispatchError {
    failures: Vec<SinkFailure>,
    attempted: usize,
}

impl DispatchError {
    /// Create from the collected failures and the number of deliveries attempted
    pub fn new(failures: Vec<SinkFailure>, attempted: usize) -> Self {
        Self {
            failures,
            attempted,
        }
    }

    /// Individual failures, in dispatch order
    #[inline]
    pub fn failures(&self) -> &[SinkFailure] {
        &self.failures
    }

    /// Number of deliveries attempted (successful or not)
    #[inline]
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    /// Names of the failed sinks, in dispatch order
    pub fn failed_sinks(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.sink.as_str())
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} sink deliveries failed",
            self.failures.len(),
            self.attempted
        )?;
        for (i, failure) in self.failures.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{}: {}", failure.sink, failure.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for DispatchError {}

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid processor configuration
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Routing table could not be compiled
    #[error("invalid routing table: {0}")]
    Routing(#[from] RoutingError),

    /// Referenced sink does not exist in the host
    #[error("failed to find exporter '{name}' for {kind}")]
    UnknownSink {
        /// Sink name
        name: String,
        /// Record kind being resolved
        kind: SignalKind,
    },

    /// Referenced sink exists but cannot accept this record kind
    #[error("exporter '{name}' does not accept {kind}")]
    IncompatibleSink {
        /// Sink name
        name: String,
        /// Record kind being resolved
        kind: SignalKind,
    },

    /// `consume` called before `start`
    #[error("routing processor not started")]
    NotStarted,

    /// `start` called twice
    #[error("routing processor already started")]
    AlreadyStarted,

    /// `start` called after `shutdown`
    #[error("routing processor already stopped")]
    AlreadyStopped,

    /// `consume` called after `shutdown`
    #[error("routing processor is stopped")]
    Stopped,

    /// Call context cancelled or past its deadline before dispatch
    #[error("call cancelled before dispatch")]
    Cancelled,

    /// One or more sinks failed
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl PipelineError {
    /// Create an UnknownSink error
    #[inline]
    pub fn unknown_sink(name: impl Into<String>, kind: SignalKind) -> Self {
        Self::UnknownSink {
            name: name.into(),
            kind,
        }
    }

    /// Create an IncompatibleSink error
    #[inline]
    pub fn incompatible_sink(name: impl Into<String>, kind: SignalKind) -> Self {
        Self::IncompatibleSink {
            name: name.into(),
            kind,
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
