//! telroute Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Only the routing attribute is required; everything else has a default.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use telroute_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[routing]\nfrom_attribute = \"X-Tenant\"").unwrap();
//! assert_eq!(config.routing.from_attribute, "X-Tenant");
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [log]
//! level = "debug"
//!
//! [sinks.otlp]
//! type = "stdout"
//!
//! [sinks."otlp/acme"]
//! type = "stdout"
//! signals = ["logs"]
//!
//! [routing]
//! from_attribute = "tenant"
//! attribute_source = "resource"
//! drop_resource_routing_attribute = true
//! default_exporters = ["otlp"]
//!
//! [[routing.table]]
//! value = "acme"
//! exporters = ["otlp/acme"]
//! ```

mod error;
mod logging;
mod routing;
mod sinks;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use routing::{AttributeSource, RouteEntry, RoutingConfig};
pub use sinks::{BUILTIN_SINKS, SinkConfig, SinkOptions, SinksConfig, StdoutSinkConfig};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults, but validation
/// requires `routing.from_attribute`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Named sink instances
    pub sinks: SinksConfig,

    /// Routing processor settings
    pub routing: RoutingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML, or fails
    /// validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Get list of enabled sink names (declared sinks only), sorted
    pub fn enabled_sinks(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .sinks
            .iter()
            .filter(|(_, sink)| sink.is_enabled())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use telroute_protocol::SignalKind;

    #[test]
    fn test_empty_config_requires_routing_attribute() {
        let err = Config::from_str("").unwrap_err();
        assert!(err.to_string().contains("from_attribute"));
    }

    #[test]
    fn test_minimal_config() {
        let config = Config::from_str("[routing]\nfrom_attribute = \"X-Tenant\"").unwrap();
        assert_eq!(config.routing.attribute_source, AttributeSource::Context);
        assert!(config.sinks.is_empty());
        assert_eq!(config.log.level, LogLevel::Info);
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[log]
level = "debug"
format = "json"

[sinks.otlp]
type = "stdout"

[sinks."otlp/acme"]
type = "stdout"
signals = ["logs"]

[sinks.discard]
type = "null"
enabled = false

[routing]
from_attribute = "tenant"
attribute_source = "resource"
drop_resource_routing_attribute = true
default_exporters = ["otlp"]

[[routing.table]]
value = "acme"
exporters = ["otlp/acme"]
"#;
        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.sinks.len(), 3);
        assert!(
            !config
                .sinks
                .get("otlp/acme")
                .unwrap()
                .accepts(SignalKind::Traces)
        );
        assert_eq!(config.routing.attribute_source, AttributeSource::Resource);
        assert!(config.routing.mutates_data());
        assert_eq!(config.routing.table.len(), 1);
        assert_eq!(config.enabled_sinks(), vec!["otlp", "otlp/acme"]);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_str("[routing\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[routing]\nfrom_attribute = \"X-Tenant\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.routing.from_attribute, "X-Tenant");
    }

    #[test]
    fn test_from_missing_file() {
        let err = Config::from_file("/nonexistent/telroute.toml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }
}
