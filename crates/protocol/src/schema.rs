//! Signal kinds
//!
//! The three record kinds a routing processor can be instantiated for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Telemetry record kind
///
/// Sinks declare which kinds they accept; the router resolves each sink
/// name against the kind it was instantiated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Logs,
    Metrics,
    Traces,
}

impl SignalKind {
    /// All signal kinds, in canonical order
    pub const ALL: [SignalKind; 3] = [Self::Logs, Self::Metrics, Self::Traces];

    /// Lowercase name used in configuration and logs
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Logs => "logs",
            Self::Metrics => "metrics",
            Self::Traces => "traces",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logs" => Ok(Self::Logs),
            "metrics" => Ok(Self::Metrics),
            "traces" => Ok(Self::Traces),
            other => Err(ProtocolError::unknown_signal(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for kind in SignalKind::ALL {
            assert_eq!(kind.as_str().parse::<SignalKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_unknown() {
        let err = "profiles".parse::<SignalKind>().unwrap_err();
        assert_eq!(err, ProtocolError::unknown_signal("profiles"));
    }

    #[test]
    fn test_display() {
        assert_eq!(SignalKind::Traces.to_string(), "traces");
    }
}
