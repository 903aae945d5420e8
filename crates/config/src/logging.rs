//! Logging configuration
//!
//! Controls the internal logging behavior of telroute. Logs go to stderr by
//! default so that the stdout sink owns standard output.

use serde::Deserialize;

/// Log level
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level - every routing decision and silent drop
    Trace,
    /// Debug level - per-batch routing summaries
    Debug,
    /// Info level - lifecycle events (default)
    #[default]
    Info,
    /// Warn level - sink failures and suspicious config
    Warn,
    /// Error level - errors only
    Error,
}

impl LogLevel {
    /// Convert to tracing level filter string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console output (default)
    #[default]
    Console,
    /// JSON structured logging
    Json,
}

/// Log output destination
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Write to stdout
    Stdout,
    /// Write to stderr (default)
    #[default]
    Stderr,
    /// Write to a file
    #[serde(untagged)]
    File(String),
}

/// Logging configuration
///
/// # Example
///
/// ```toml
/// [log]
/// level = "debug"
/// format = "json"
/// output = "stderr"
/// filter = "telroute_pipeline=trace"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    /// Default: info
    pub level: LogLevel,

    /// Output format (console, json)
    /// Default: console
    pub format: LogFormat,

    /// Output destination (stdout, stderr, or file path)
    /// Default: stderr
    pub output: LogOutput,

    /// Extra `EnvFilter` directives appended after the level
    pub filter: Option<String>,
}

impl LogConfig {
    /// Build the filter directive string for this config
    ///
    /// `RUST_LOG` still takes precedence when set; this is the fallback.
    pub fn directives(&self) -> String {
        match &self.filter {
            Some(extra) if !extra.trim().is_empty() => {
                format!("{},{}", self.level.as_str(), extra.trim())
            }
            _ => self.level.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Console);
        assert_eq!(config.output, LogOutput::Stderr);
        assert_eq!(config.filter, None);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
level = "debug"
format = "json"
output = "/var/log/telroute.log"
filter = "telroute_pipeline=trace"
"#;
        let config: LogConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(
            config.output,
            LogOutput::File("/var/log/telroute.log".into())
        );
        assert_eq!(config.directives(), "debug,telroute_pipeline=trace");
    }

    #[test]
    fn test_deserialize_all_levels() {
        for (s, expected) in [
            ("trace", LogLevel::Trace),
            ("debug", LogLevel::Debug),
            ("info", LogLevel::Info),
            ("warn", LogLevel::Warn),
            ("error", LogLevel::Error),
        ] {
            let toml = format!("level = \"{}\"", s);
            let config: LogConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config.level, expected);
            assert_eq!(config.level.as_str(), s);
        }
    }

    #[test]
    fn test_directives_without_filter() {
        let config = LogConfig {
            level: LogLevel::Warn,
            filter: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(config.directives(), "warn");
    }
}
