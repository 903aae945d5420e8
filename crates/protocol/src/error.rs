//! Protocol error types

use thiserror::Error;

/// Errors that can occur when handling protocol types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// Signal name is not one of logs, metrics, traces
    #[error("unknown signal '{0}': expected one of logs, metrics, traces")]
    UnknownSignal(String),

    /// Metadata entry is not in `key=value` form
    #[error("invalid metadata entry '{0}': expected key=value")]
    InvalidMetadata(String),
}

impl ProtocolError {
    /// Create an unknown signal error
    #[inline]
    pub fn unknown_signal(name: impl Into<String>) -> Self {
        Self::UnknownSignal(name.into())
    }

    /// Create an invalid metadata error
    #[inline]
    pub fn invalid_metadata(entry: impl Into<String>) -> Self {
        Self::InvalidMetadata(entry.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_signal_error() {
        let err = ProtocolError::unknown_signal("profiles");
        assert!(err.to_string().contains("profiles"));
        assert!(err.to_string().contains("unknown signal"));
    }

    #[test]
    fn test_invalid_metadata_error() {
        let err = ProtocolError::invalid_metadata("tenant");
        assert!(err.to_string().contains("key=value"));
    }
}
