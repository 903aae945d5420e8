//! Routing processor configuration
//!
//! Defines which attribute selects the route, where that attribute is read
//! from, and which sinks each value is forwarded to. Entries are matched by
//! exact value in order; the first match wins. Unmatched traffic goes to the
//! default sinks.
//!
//! # Example
//!
//! ```toml
//! [routing]
//! from_attribute = "X-Tenant"
//! attribute_source = "context"
//! default_exporters = ["otlp"]
//!
//! [[routing.table]]
//! value = "acme"
//! exporters = ["otlp/acme"]
//!
//! [[routing.table]]
//! value = "globex"
//! exporters = ["otlp/globex", "otlp"]
//! ```

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Where the routing attribute is read from
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttributeSource {
    /// Call-scoped metadata (e.g. request headers); one key per batch (default)
    #[default]
    Context,
    /// Resource attributes; one key per resource group
    Resource,
}

impl AttributeSource {
    /// Get the config string for this source
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::Resource => "resource",
        }
    }
}

/// Routing processor configuration
///
/// Immutable once the processor is constructed; changing routes requires a
/// restart.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutingConfig {
    /// Name of the attribute holding the route value
    /// Required, non-empty
    pub from_attribute: String,

    /// Where to read `from_attribute` from
    /// Default: context
    pub attribute_source: AttributeSource,

    /// Route entries (matched in order, first match wins)
    pub table: Vec<RouteEntry>,

    /// Sinks for traffic that matches no entry
    /// If empty, unmatched traffic is dropped
    pub default_exporters: Vec<String>,

    /// Remove the routing attribute from forwarded resources
    /// Only applies to the resource source
    pub drop_resource_routing_attribute: bool,
}

/// A single route entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteEntry {
    /// Exact attribute value to match
    pub value: String,

    /// Target sinks, in dispatch order
    #[serde(default)]
    pub exporters: Vec<String>,
}

impl RouteEntry {
    /// Create a route entry
    pub fn new<S: Into<String>>(
        value: impl Into<String>,
        exporters: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            value: value.into(),
            exporters: exporters.into_iter().map(Into::into).collect(),
        }
    }
}

impl RoutingConfig {
    /// Create a config routing on the given attribute (context source)
    pub fn new(from_attribute: impl Into<String>) -> Self {
        Self {
            from_attribute: from_attribute.into(),
            ..Default::default()
        }
    }

    /// Set the attribute source
    #[must_use]
    pub fn with_source(mut self, source: AttributeSource) -> Self {
        self.attribute_source = source;
        self
    }

    /// Append a route entry
    #[must_use]
    pub fn with_route<S: Into<String>>(
        mut self,
        value: impl Into<String>,
        exporters: impl IntoIterator<Item = S>,
    ) -> Self {
        self.table.push(RouteEntry::new(value, exporters));
        self
    }

    /// Set the default sinks
    #[must_use]
    pub fn with_default<S: Into<String>>(mut self, exporters: impl IntoIterator<Item = S>) -> Self {
        self.default_exporters = exporters.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable removal of the routing attribute
    #[must_use]
    pub fn with_drop_routing_attribute(mut self, drop: bool) -> Self {
        self.drop_resource_routing_attribute = drop;
        self
    }

    /// Check if forwarded data is modified (routing attribute removed)
    pub fn mutates_data(&self) -> bool {
        self.attribute_source == AttributeSource::Resource && self.drop_resource_routing_attribute
    }

    /// Check if `drop_resource_routing_attribute` is set but has no effect
    pub fn drop_is_ignored(&self) -> bool {
        self.drop_resource_routing_attribute && self.attribute_source != AttributeSource::Resource
    }

    /// Get all sink names referenced in routing, deduplicated, in first-use order
    ///
    /// Default sinks come first, then entries in table order.
    pub fn referenced_sinks(&self) -> Vec<&str> {
        let mut sinks: Vec<&str> = Vec::new();
        let all = self
            .default_exporters
            .iter()
            .chain(self.table.iter().flat_map(|e| e.exporters.iter()));

        for sink in all {
            if !sinks.contains(&sink.as_str()) {
                sinks.push(sink.as_str());
            }
        }
        sinks
    }

    /// Validate the routing configuration on its own
    ///
    /// Checks that `from_attribute` is set and every entry has a value and at
    /// least one sink. Sink existence is checked against the full config (or
    /// the host at start).
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.from_attribute.trim().is_empty() {
            return Err(ConfigError::missing_field(
                "processor",
                "routing",
                "from_attribute",
            ));
        }

        for (position, entry) in self.table.iter().enumerate() {
            if entry.value.is_empty() {
                return Err(ConfigError::invalid_value(
                    "processor",
                    "routing",
                    "table",
                    format!("invalid (empty) route at position {position}"),
                ));
            }
            if entry.exporters.is_empty() {
                return Err(ConfigError::invalid_value(
                    "processor",
                    "routing",
                    "table",
                    format!(
                        "invalid route '{}': no exporters defined for the route",
                        entry.value
                    ),
                ));
            }
        }

        if let Some(name) = self.referenced_sinks().into_iter().find(|s| s.is_empty()) {
            return Err(ConfigError::invalid_value(
                "processor",
                "routing",
                "exporters",
                format!("sink name '{name}' is empty"),
            ));
        }

        Ok(())
    }
}
