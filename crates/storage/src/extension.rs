//! Storage extensions and component identity
//!
//! An extension hands out one client per component. The component's kind and
//! name select which data the client sees.

use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;

use crate::client::StorageClient;
use crate::error::Result;

/// Kind of component requesting storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Ingests data into the pipeline
    Receiver,
    /// Transforms or routes data between receivers and exporters
    Processor,
    /// Sends data out of the pipeline
    Exporter,
    /// Auxiliary service such as storage
    Extension,
}

impl ComponentKind {
    /// Lowercase name used in storage file names
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Receiver => "receiver",
            Self::Processor => "processor",
            Self::Exporter => "exporter",
            Self::Extension => "extension",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the component that owns a storage client
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentId {
    kind: ComponentKind,
    name: String,
}

impl ComponentId {
    /// Create a component identity
    pub fn new(kind: ComponentKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Component kind
    #[inline]
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Component name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stable file name for this component: `<kind>_<escaped name>`
    ///
    /// Bytes of the name outside `[A-Za-z0-9._-]` are percent-encoded, so
    /// `filelog/acme` maps to `receiver_filelog%2Facme` and distinct names
    /// never share a file.
    pub fn file_name(&self) -> String {
        let mut out = String::with_capacity(self.kind.as_str().len() + 1 + self.name.len());
        out.push_str(self.kind.as_str());
        out.push('_');
        for byte in self.name.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-') {
                out.push(char::from(byte));
            } else {
                let _ = write!(out, "%{byte:02X}");
            }
        }
        out
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

/// Provider of storage clients
#[async_trait]
pub trait StorageExtension: Send + Sync {
    /// Short type name for logs (`memory`, `file`)
    fn kind(&self) -> &'static str;

    /// Open the client for one component
    async fn client(&self, component: &ComponentId) -> Result<Arc<dyn StorageClient>>;

    /// Release everything the extension holds
    async fn shutdown(&self) -> Result<()>;
}
