//! Configuration validation
//!
//! Validates config consistency:
//! - The routing processor section is complete (see `RoutingConfig::validate`)
//! - Sinks referenced by routing exist (declared or built in)
//! - Sinks referenced by routing are enabled
//! - Declared sinks have usable names

use crate::Config;
use crate::error::{ConfigError, Result};

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_sinks(config)?;
    validate_routing(config)?;
    Ok(())
}

/// Validate sink declarations
fn validate_sinks(config: &Config) -> Result<()> {
    for (name, _) in config.sinks.iter() {
        if name.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "sink",
                name.as_str(),
                "name",
                "sink names must not be empty",
            ));
        }
    }
    Ok(())
}

/// Validate routing and its references into `[sinks]`
fn validate_routing(config: &Config) -> Result<()> {
    config.routing.validate()?;

    for sink_name in config.routing.referenced_sinks() {
        let Some(sink) = config.sinks.resolve(sink_name) else {
            return Err(ConfigError::unknown_sink(sink_name));
        };

        if !sink.is_enabled() {
            return Err(ConfigError::invalid_value(
                "sink",
                sink_name,
                "enabled",
                "sink is referenced by routing but disabled",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::{Config, ConfigError};

    #[test]
    fn test_valid_minimal_config() {
        let toml = r#"
[routing]
from_attribute = "X-Tenant"
default_exporters = ["stdout"]
"#;
        assert!(Config::from_str(toml).is_ok());
    }

    #[test]
    fn test_unknown_default_sink() {
        let toml = r#"
[routing]
from_attribute = "X-Tenant"
default_exporters = ["otlp"]
"#;
        let err = Config::from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSink { ref sink } if sink == "otlp"));
    }

    #[test]
    fn test_unknown_table_sink() {
        let toml = r#"
[sinks.otlp]
type = "stdout"

[routing]
from_attribute = "X-Tenant"
default_exporters = ["otlp"]

[[routing.table]]
value = "acme"
exporters = ["otlp", "otlp/acme"]
"#;
        let err = Config::from_str(toml).unwrap_err();
        assert!(err.to_string().contains("otlp/acme"));
    }

    #[test]
    fn test_disabled_sink_referenced() {
        let toml = r#"
[sinks.otlp]
type = "stdout"
enabled = false

[routing]
from_attribute = "X-Tenant"
default_exporters = ["otlp"]
"#;
        let err = Config::from_str(toml).unwrap_err();
        assert!(err.to_string().contains("disabled"));
    }

    #[test]
    fn test_disabled_sink_unreferenced_is_fine() {
        let toml = r#"
[sinks.spare]
type = "null"
enabled = false

[routing]
from_attribute = "X-Tenant"
"#;
        assert!(Config::from_str(toml).is_ok());
    }

    #[test]
    fn test_empty_sink_name() {
        let toml = r#"
[sinks.""]
type = "null"

[routing]
from_attribute = "X-Tenant"
"#;
        let err = Config::from_str(toml).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_routing_errors_surface() {
        let toml = r#"
[routing]
from_attribute = "X-Tenant"

[[routing.table]]
value = ""
exporters = ["stdout"]
"#;
        let err = Config::from_str(toml).unwrap_err();
        assert!(err.to_string().contains("invalid (empty) route"));
    }
}
