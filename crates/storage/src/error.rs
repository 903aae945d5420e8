//! Storage error types

use std::io;
use std::path::Path;

use thiserror::Error;

/// Errors returned by storage clients and the storage adapter
#[derive(Debug, Error)]
pub enum StorageError {
    /// Operation on a client after `close()`
    #[error("client closed")]
    ClientClosed,

    /// More than one storage extension registered in the host
    #[error("storage client: multiple storage extensions found")]
    MultipleExtensions,

    /// Data operation on an adapter that was never started
    #[error("storage adapter not started")]
    NotStarted,

    /// Filesystem failure in a file-backed client
    #[error("storage I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A storage file could not be decoded
    #[error("corrupt storage file {path}: {message}")]
    Corrupt { path: String, message: String },
}

impl StorageError {
    /// Create an Io error for a path
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Create a Corrupt error for a path
    pub fn corrupt(path: &Path, message: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.display().to_string(),
            message: message.into(),
        }
    }
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(StorageError::ClientClosed.to_string(), "client closed");
        assert_eq!(
            StorageError::MultipleExtensions.to_string(),
            "storage client: multiple storage extensions found"
        );
    }

    #[test]
    fn test_io_includes_path() {
        let err = StorageError::io(
            Path::new("/var/lib/telroute/receiver_filelog"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/var/lib/telroute/receiver_filelog"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_corrupt() {
        let err = StorageError::corrupt(Path::new("state"), "bad magic");
        assert!(matches!(err, StorageError::Corrupt { .. }));
        assert!(err.to_string().contains("bad magic"));
    }
}
