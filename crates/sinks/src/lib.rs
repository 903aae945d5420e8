//! telroute Sinks
//!
//! Built-in sinks for the routing processor. Every sink implements
//! `telroute_pipeline::Sink` for logs, metrics and traces, so one instance
//! can be registered for any subset of record kinds.
//!
//! ```text
//! [RoutingProcessor<B>] --ingest(ctx, B)--> [Sink] --> [Destination]
//! ```
//!
//! # Available Sinks
//!
//! | Sink | Purpose | Configurable |
//! |------|---------|--------------|
//! | `null` | Count and discard | Yes (`type = "null"`) |
//! | `stdout` | JSON lines for debugging | Yes (`type = "stdout"`) |
//! | `capture` | In-memory, for tests and dry runs | No |
//!
//! # Example
//!
//! ```ignore
//! use telroute_sinks::build_sinks;
//!
//! let config = Config::from_file("telroute.toml")?;
//! let sinks = build_sinks(&config);
//!
//! let mut processor = RoutingProcessor::<Logs>::new(config.routing.clone())?;
//! processor.start(sinks.registry())?;
//! ```

// =============================================================================
// Sink implementations (each in its own submodule)
// =============================================================================

/// Null sink - counts and discards all data
pub mod null;

/// Stdout sink - JSON line debug output
pub mod stdout;

/// Capture sink - keeps batches in memory
pub mod capture;

// =============================================================================
// Shared utilities
// =============================================================================

mod common;
mod registry;

pub use common::{MetricsSnapshot, SinkMetrics, SinkMetricsHandle};
pub use registry::{BuiltSinks, build_sinks};
