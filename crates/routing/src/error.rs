//! Routing error types

use thiserror::Error;

/// Result type for routing operations
pub type Result<T> = std::result::Result<T, RoutingError>;

/// Errors that can occur during routing table compilation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoutingError {
    /// Route entry has an empty match value
    #[error("invalid (empty) route at position {position}")]
    EmptyRouteValue {
        /// Position of the entry in the table
        position: usize,
    },

    /// Route entry lists no sinks
    #[error("invalid route '{value}': no exporters defined for the route")]
    EmptySinks {
        /// Match value of the entry
        value: String,
    },

    /// More distinct sinks or destination sets than ids can address
    #[error("routing table exceeds {max} distinct {what}")]
    CapacityExceeded {
        /// What ran out ("sinks" or "destinations")
        what: &'static str,
        /// Maximum supported
        max: usize,
    },
}

impl RoutingError {
    /// Create an EmptyRouteValue error
    #[inline]
    pub fn empty_route_value(position: usize) -> Self {
        Self::EmptyRouteValue { position }
    }

    /// Create an EmptySinks error
    #[inline]
    pub fn empty_sinks(value: impl Into<String>) -> Self {
        Self::EmptySinks {
            value: value.into(),
        }
    }

    /// Create a CapacityExceeded error
    #[inline]
    pub fn capacity_exceeded(what: &'static str, max: usize) -> Self {
        Self::CapacityExceeded { what, max }
    }
}
