//! telroute Routing - attribute routing tables
//!
//! Pre-compiled tables for O(1) route value→sinks lookup.
//! Zero-copy design: all allocations happen at compile time, not per-batch.
//!
//! # Design
//!
//! Routing decisions are compiled at config load time. The `RoutingTable`
//! maps exact route values to interned destination sets. A destination set
//! is an ordered sink list; identical lists share one `DestinationId`, which
//! lets the router merge resource groups by a plain integer.
//!
//! # Zero-Copy Guarantees
//!
//! - `SinkId` and `DestinationId` are `Copy` - no heap allocation
//! - `route()` returns a `Destination` borrowing a slice of pre-allocated storage
//! - No allocations in the hot path
//!
//! # Example
//!
//! ```
//! use telroute_routing::{RouteKey, RoutingTableBuilder};
//!
//! // At startup: compile routing table from config
//! let mut builder = RoutingTableBuilder::new();
//! builder.set_default_by_name(&["otlp"]).unwrap();
//! builder.add_route_by_name("acme", &["otlp/acme", "otlp"]).unwrap();
//! let table = builder.build();
//!
//! // Hot path: O(1) lookup, returns slice (zero-copy)
//! let dest = table.route(RouteKey::Value("acme"));
//! assert_eq!(dest.sinks.len(), 2);
//!
//! let dest = table.route(RouteKey::Value("globex"));
//! assert!(!dest.matched);
//! assert_eq!(dest.sinks.len(), 1);
//! ```

mod error;
mod ids;
mod key;
mod table;


pub use error::{Result, RoutingError};
pub use ids::{DestinationId, SinkId};
pub use key::RouteKey;
pub use table::{Destination, RoutingTable, RoutingTableBuilder};
