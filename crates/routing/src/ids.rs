//! Identifier types
//!
//! `SinkId` names a resolved sink; `DestinationId` names a distinct ordered
//! sink list. Both are small `Copy` indexes assigned at compile time so the
//! hot path groups and dispatches by index instead of by string.

use std::fmt;

/// Sink identifier
///
/// Index into the router's resolved sink handles. Assigned in the order sink
/// names are first referenced by the configuration.
///
/// # Example
///
/// ```
/// use telroute_routing::SinkId;
///
/// let sink = SinkId::new(0);
/// let copy = sink;
/// assert_eq!(sink, copy);
/// assert_eq!(sink.to_string(), "sink:0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SinkId(u16);

impl SinkId {
    /// Maximum number of sinks supported
    pub const MAX: u16 = u16::MAX;

    /// Create a sink ID from a numeric index
    #[inline]
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Get the numeric index of this sink
    #[inline]
    #[must_use]
    pub const fn index(self) -> u16 {
        self.0
    }

    /// Get the index as usize (for array indexing)
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sink:{}", self.0)
    }
}

impl From<u16> for SinkId {
    #[inline]
    fn from(index: u16) -> Self {
        Self::new(index)
    }
}

/// Destination set identifier
///
/// Two route entries (or an entry and the default route) listing the same
/// sinks in the same order share one `DestinationId`. Resource groups are
/// merged into one outgoing batch per `DestinationId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DestinationId(u16);

impl DestinationId {
    /// Maximum number of distinct destination sets supported
    pub const MAX: u16 = u16::MAX;

    /// Create a destination ID from a numeric index
    #[inline]
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Get the index as usize (for array indexing)
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dest:{}", self.0)
    }
}
