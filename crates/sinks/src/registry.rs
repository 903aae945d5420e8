//! Sink construction from configuration
//!
//! Turns the `[sinks]` section into a `SinkRegistry` the routing processors
//! resolve names against. Built-in names (`stdout`, `null`) referenced by
//! routing are instantiated even when not declared.

use std::sync::Arc;

use telroute_config::{Config, SinkConfig};
use telroute_pipeline::SinkRegistry;
use telroute_protocol::SignalKind;
use tracing::{debug, info};

use crate::common::SinkMetricsHandle;
use crate::null::NullSink;
use crate::stdout::{StdoutConfig, StdoutSink};

/// Sinks built from configuration
#[derive(Debug, Default)]
pub struct BuiltSinks {
    registry: SinkRegistry,
    metrics: Vec<SinkMetricsHandle>,
}

impl BuiltSinks {
    /// Registry to start routing processors against
    pub fn registry(&self) -> &SinkRegistry {
        &self.registry
    }

    /// Consume into the registry
    pub fn into_registry(self) -> SinkRegistry {
        self.registry
    }

    /// Metrics handles, one per instantiated sink
    pub fn metrics_handles(&self) -> &[SinkMetricsHandle] {
        &self.metrics
    }

    /// Number of instantiated sinks
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Check if no sinks were instantiated
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Build every enabled sink in `config`
///
/// Declared sinks are registered for the record kinds their `signals` list
/// allows (all kinds when empty). Disabled sinks are skipped.
pub fn build_sinks(config: &Config) -> BuiltSinks {
    let mut names = config.enabled_sinks();
    for referenced in config.routing.referenced_sinks() {
        if !config.sinks.contains(referenced) && !names.iter().any(|n| n == referenced) {
            names.push(referenced.to_string());
        }
    }

    let mut built = BuiltSinks::default();

    for name in names {
        let Some(sink_config) = config.sinks.resolve(&name) else {
            // Validation rejects unknown referenced names; nothing to build
            debug!(sink = %name, "no sink config, skipping");
            continue;
        };
        if !sink_config.is_enabled() {
            debug!(sink = %name, "sink disabled, skipping");
            continue;
        }

        let kinds = accepted_kinds(&sink_config);
        let handle = match sink_config {
            SinkConfig::Null(_) => {
                let sink = Arc::new(NullSink::with_name(name.as_str()));
                let handle = sink.metrics_handle();
                built.registry.register(name.as_str(), sink, &kinds);
                handle
            }
            SinkConfig::Stdout(stdout) => {
                let sink = Arc::new(StdoutSink::with_config(
                    name.as_str(),
                    StdoutConfig::from(&stdout),
                ));
                let handle = sink.metrics_handle();
                built.registry.register(name.as_str(), sink, &kinds);
                handle
            }
        };

        info!(
            sink = %name,
            sink_type = handle.sink_type(),
            kinds = ?kinds,
            "sink registered"
        );
        built.metrics.push(handle);
    }

    built
}

fn accepted_kinds(config: &SinkConfig) -> Vec<SignalKind> {
    SignalKind::ALL
        .into_iter()
        .filter(|kind| config.accepts(*kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use telroute_pipeline::Host;

    use super::*;

    #[test]
    fn test_builds_declared_and_builtin_sinks() {
        let config = Config::from_str(
            r#"
[sinks.otlp]
type = "null"

[sinks."otlp/acme"]
type = "stdout"
signals = ["logs"]

[routing]
from_attribute = "X-Tenant"
default_exporters = ["otlp", "null"]

[[routing.table]]
value = "acme"
exporters = ["otlp/acme"]
"#,
        )
        .unwrap();

        let built = build_sinks(&config);
        assert_eq!(built.len(), 3);

        let registry = built.registry();
        assert!(registry.lookup_traces_sink("otlp").is_some());
        assert!(registry.lookup_metrics_sink("null").is_some());
        assert_eq!(registry.kinds("otlp/acme"), vec![SignalKind::Logs]);
    }

    #[test]
    fn test_disabled_sink_not_registered() {
        let config = Config::from_str(
            r#"
[sinks.debug]
type = "stdout"
enabled = false

[routing]
from_attribute = "X-Tenant"
"#,
        )
        .unwrap();

        let built = build_sinks(&config);
        assert!(built.is_empty());
        assert!(!built.registry().has_sink("debug"));
    }

    #[test]
    fn test_unreferenced_builtins_not_built() {
        let config = Config::from_str(
            r#"
[routing]
from_attribute = "X-Tenant"
default_exporters = ["stdout"]
"#,
        )
        .unwrap();

        let built = build_sinks(&config);
        assert_eq!(built.len(), 1);
        assert_eq!(built.metrics_handles()[0].sink_type(), "stdout");
        assert!(!built.into_registry().has_sink("null"));
    }
}
