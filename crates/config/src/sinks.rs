//! Sink configuration types
//!
//! Sinks are named instances, so one type can appear several times under
//! different names (e.g. `stdout` and `stdout/acme`). Each sink may be
//! restricted to a subset of record kinds.

use serde::Deserialize;
use std::collections::HashMap;

use telroute_protocol::SignalKind;

/// Built-in sinks that don't need to be declared in config
pub const BUILTIN_SINKS: &[&str] = &["stdout", "null"];

/// Container for all sink configurations
///
/// Sinks are stored as a map of name -> config.
///
/// # Example
///
/// ```toml
/// [sinks.otlp]
/// type = "stdout"
///
/// [sinks."otlp/acme"]
/// type = "stdout"
/// signals = ["logs", "traces"]
///
/// [sinks.discard]
/// type = "null"
/// enabled = false
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SinksConfig {
    /// Named sink instances
    #[serde(flatten)]
    sinks: HashMap<String, SinkConfig>,
}

impl SinksConfig {
    /// Get a sink by name
    pub fn get(&self, name: &str) -> Option<&SinkConfig> {
        self.sinks.get(name)
    }

    /// Check if a sink exists
    pub fn contains(&self, name: &str) -> bool {
        self.sinks.contains_key(name)
    }

    /// Iterate over all sinks
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SinkConfig)> {
        self.sinks.iter()
    }

    /// Get the number of configured sinks
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Check if no sinks are configured
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Add or replace a sink
    pub fn insert(&mut self, name: impl Into<String>, sink: SinkConfig) {
        self.sinks.insert(name.into(), sink);
    }

    /// Resolve a sink name, falling back to the built-in sinks
    ///
    /// A declared sink shadows a built-in of the same name.
    pub fn resolve(&self, name: &str) -> Option<SinkConfig> {
        if let Some(sink) = self.sinks.get(name) {
            return Some(sink.clone());
        }
        match name {
            "stdout" => Some(SinkConfig::Stdout(StdoutSinkConfig::default())),
            "null" => Some(SinkConfig::Null(SinkOptions::default())),
            _ => None,
        }
    }
}

/// Configuration for a single sink instance
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkConfig {
    /// Null sink - counts and discards all data
    Null(SinkOptions),

    /// Stdout sink - one JSON line per batch
    Stdout(StdoutSinkConfig),
}

impl SinkConfig {
    /// Get the common options
    pub fn options(&self) -> &SinkOptions {
        match self {
            Self::Null(o) => o,
            Self::Stdout(c) => &c.options,
        }
    }

    /// Check if the sink is enabled
    pub fn is_enabled(&self) -> bool {
        self.options().enabled
    }

    /// Check if the sink accepts a record kind
    pub fn accepts(&self, kind: SignalKind) -> bool {
        self.options().accepts(kind)
    }

    /// Get the sink type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null(_) => "null",
            Self::Stdout(_) => "stdout",
        }
    }
}

/// Options shared by every sink type
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SinkOptions {
    /// Whether this sink is enabled
    /// Default: true
    pub enabled: bool,

    /// Record kinds this sink accepts
    /// Default: empty (all kinds)
    pub signals: Vec<SignalKind>,
}

impl Default for SinkOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            signals: Vec::new(),
        }
    }
}

impl SinkOptions {
    /// Check if a record kind is accepted
    pub fn accepts(&self, kind: SignalKind) -> bool {
        self.signals.is_empty() || self.signals.contains(&kind)
    }
}

/// Stdout sink configuration
///
/// ```toml
/// [sinks.debug]
/// type = "stdout"
/// pretty = true
/// summary_only = false
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StdoutSinkConfig {
    /// Common sink options
    #[serde(flatten)]
    pub options: SinkOptions,

    /// Pretty-print each batch over several lines
    pub pretty: bool,

    /// Write only the summary fields, not the batch itself
    pub summary_only: bool,
}
