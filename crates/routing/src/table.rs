//! Routing table for O(1) key→destination lookup
//!
//! The routing table is compiled once at startup from configuration.
//! All allocations happen during compilation - the hot path is zero-copy.

use std::collections::HashMap;

use crate::error::{Result, RoutingError};
use crate::{DestinationId, RouteKey, SinkId};

/// Result of a routing lookup
///
/// Borrowed from the table; `sinks` is a slice into pre-allocated storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination<'a> {
    /// Interned id of the ordered sink list
    pub id: DestinationId,
    /// Sinks to dispatch to, in configuration order
    pub sinks: &'a [SinkId],
    /// Whether a table entry matched (false = default route)
    pub matched: bool,
}

impl Destination<'_> {
    /// Check if data routed here is dropped (no sinks)
    #[inline]
    pub fn is_drop(&self) -> bool {
        self.sinks.is_empty()
    }
}

/// Pre-compiled routing table
///
/// Maps route values to destination sets. Each distinct ordered sink list is
/// interned once, so two entries listing the same sinks in the same order
/// resolve to the same `DestinationId`.
///
/// # Precedence
///
/// Entries are matched by exact string equality. When two entries share a
/// value, the first one added wins and later ones are ignored.
///
/// # Example
///
/// ```
/// use telroute_routing::{RouteKey, RoutingTable};
///
/// let mut table = RoutingTable::new();
/// let otlp = table.register_sink("otlp");
/// let acme = table.register_sink("otlp/acme");
///
/// table.set_default(vec![otlp]);
/// table.add_route("acme", vec![acme]);
///
/// let dest = table.route(RouteKey::Value("acme"));
/// assert!(dest.matched);
/// assert_eq!(dest.sinks, &[acme]);
///
/// // Missing attribute falls back to the default route
/// let dest = table.route(RouteKey::Absent);
/// assert!(!dest.matched);
/// assert_eq!(dest.sinks, &[otlp]);
/// ```
#[derive(Debug, Clone)]
pub struct RoutingTable {
    /// Route value → destination (first entry per value only)
    routes: HashMap<String, DestinationId>,

    /// Effective entries in configuration order (for diagnostics)
    entries: Vec<(String, DestinationId)>,

    /// Interned destination sets, indexed by DestinationId
    ///
    /// Index 0 is always the empty (drop) destination.
    destinations: Vec<Vec<SinkId>>,

    /// Destination for keys that match no entry
    default_destination: DestinationId,

    /// Sink names for debugging/metrics (indexed by SinkId)
    sink_names: Vec<String>,
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutingTable {
    /// Create an empty routing table
    ///
    /// The default route starts out empty: unmatched data is dropped until
    /// `set_default` is called.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            entries: Vec::new(),
            destinations: vec![Vec::new()],
            default_destination: DestinationId::new(0),
            sink_names: Vec::new(),
        }
    }

    /// Register a sink name (for debugging/metrics)
    ///
    /// Returns the assigned SinkId. Sinks should be registered in order.
    #[inline]
    pub fn register_sink(&mut self, name: impl Into<String>) -> SinkId {
        let id = SinkId::new(self.sink_names.len() as u16);
        self.sink_names.push(name.into());
        id
    }

    /// Set the default sinks for keys without a matching entry
    pub fn set_default(&mut self, sinks: Vec<SinkId>) {
        self.default_destination = self.intern(sinks);
    }

    /// Add a route from a value to sinks
    ///
    /// Returns `false` (and leaves the table unchanged) if an entry with the
    /// same value already exists.
    pub fn add_route(&mut self, value: impl Into<String>, sinks: Vec<SinkId>) -> bool {
        let value = value.into();
        if self.routes.contains_key(&value) {
            return false;
        }

        let id = self.intern(sinks);
        self.routes.insert(value.clone(), id);
        self.entries.push((value, id));
        true
    }

    /// Intern an ordered sink list, returning its id
    fn intern(&mut self, sinks: Vec<SinkId>) -> DestinationId {
        if let Some(pos) = self.destinations.iter().position(|d| *d == sinks) {
            return DestinationId::new(pos as u16);
        }
        let id = DestinationId::new(self.destinations.len() as u16);
        self.destinations.push(sinks);
        id
    }

    /// Resolve a route key to its destination
    ///
    /// This is the hot path - one HashMap lookup, no allocation.
    /// `RouteKey::Absent` never matches and always yields the default route.
    #[inline]
    pub fn route(&self, key: RouteKey<'_>) -> Destination<'_> {
        let matched = key.as_str().and_then(|v| self.routes.get(v)).copied();

        let id = matched.unwrap_or(self.default_destination);
        Destination {
            id,
            sinks: &self.destinations[id.as_usize()],
            matched: matched.is_some(),
        }
    }

    /// Get the sinks of an interned destination
    #[inline]
    pub fn destination(&self, id: DestinationId) -> Option<&[SinkId]> {
        self.destinations.get(id.as_usize()).map(Vec::as_slice)
    }

    /// Check if a value has an explicit route
    #[inline]
    pub fn has_route(&self, value: &str) -> bool {
        self.routes.contains_key(value)
    }

    /// Get the default sinks
    #[inline]
    pub fn default_sinks(&self) -> &[SinkId] {
        &self.destinations[self.default_destination.as_usize()]
    }

    /// Get the name of a sink by ID (for debugging/metrics)
    #[inline]
    pub fn sink_name(&self, id: SinkId) -> Option<&str> {
        self.sink_names.get(id.as_usize()).map(String::as_str)
    }

    /// Get the number of effective routes
    #[inline]
    pub fn route_count(&self) -> usize {
        self.entries.len()
    }

    /// Get the number of registered sinks
    #[inline]
    pub fn sink_count(&self) -> usize {
        self.sink_names.len()
    }

    /// Get the number of distinct destination sets
    ///
    /// Always counts the empty drop destination at index 0, whether or not
    /// any route or the default uses it.
    #[inline]
    pub fn destination_count(&self) -> usize {
        self.destinations.len()
    }

    /// Check if the routing table is empty (no routes, no defaults)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.default_sinks().is_empty()
    }

    /// Iterate over effective routes in configuration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SinkId])> {
        self.entries
            .iter()
            .map(|(v, id)| (v.as_str(), self.destinations[id.as_usize()].as_slice()))
    }

    /// Get all registered sink names
    #[inline]
    pub fn sink_names(&self) -> &[String] {
        &self.sink_names
    }
}

/// Builder for constructing routing tables from configuration
///
/// Registers sink names as they are first referenced and validates each
/// entry as it is added.
#[derive(Debug, Default)]
pub struct RoutingTableBuilder {
    /// Registered sinks: name → id
    sink_ids: HashMap<String, SinkId>,

    /// Number of entries offered so far (including shadowed duplicates)
    position: usize,

    /// Table being built
    table: RoutingTable,
}

impl RoutingTableBuilder {
    /// Create a new builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink and get its ID
    ///
    /// If the sink is already registered, returns the existing ID.
    pub fn register_sink(&mut self, name: &str) -> Result<SinkId> {
        if let Some(&id) = self.sink_ids.get(name) {
            return Ok(id);
        }
        if self.table.sink_count() > usize::from(SinkId::MAX) {
            return Err(RoutingError::capacity_exceeded(
                "sinks",
                usize::from(SinkId::MAX) + 1,
            ));
        }

        let id = self.table.register_sink(name);
        self.sink_ids.insert(name.to_string(), id);
        Ok(id)
    }

    /// Get the ID of a registered sink
    #[inline]
    pub fn get_sink_id(&self, name: &str) -> Option<SinkId> {
        self.sink_ids.get(name).copied()
    }

    fn resolve_names(&mut self, sink_names: &[impl AsRef<str>]) -> Result<Vec<SinkId>> {
        sink_names
            .iter()
            .map(|name| self.register_sink(name.as_ref()))
            .collect()
    }

    fn check_destination_capacity(&self) -> Result<()> {
        if self.table.destination_count() > usize::from(DestinationId::MAX) {
            return Err(RoutingError::capacity_exceeded(
                "destinations",
                usize::from(DestinationId::MAX) + 1,
            ));
        }
        Ok(())
    }

    /// Add a route from a value to sinks (by name)
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty or the sink list is empty.
    /// A duplicate value is not an error: the earlier entry wins.
    pub fn add_route_by_name(
        &mut self,
        value: &str,
        sink_names: &[impl AsRef<str>],
    ) -> Result<()> {
        let position = self.position;
        self.position += 1;

        if value.is_empty() {
            return Err(RoutingError::empty_route_value(position));
        }
        if sink_names.is_empty() {
            return Err(RoutingError::empty_sinks(value));
        }
        self.check_destination_capacity()?;

        let sinks = self.resolve_names(sink_names)?;
        if !self.table.add_route(value, sinks) {
            tracing::warn!(
                value,
                position,
                "duplicate route value, earlier entry takes precedence"
            );
        }
        Ok(())
    }

    /// Set default sinks (by name)
    ///
    /// An empty list means unmatched data is dropped.
    pub fn set_default_by_name(&mut self, sink_names: &[impl AsRef<str>]) -> Result<()> {
        self.check_destination_capacity()?;
        let sinks = self.resolve_names(sink_names)?;
        self.table.set_default(sinks);
        Ok(())
    }

    /// Build the routing table
    #[must_use]
    pub fn build(self) -> RoutingTable {
        self.table
    }
}
