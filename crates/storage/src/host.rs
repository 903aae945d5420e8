//! Storage host - the extensions available to components
//!
//! A component may use at most one storage extension. With none configured
//! it gets a no-op client; with more than one, obtaining a client fails
//! before any data is read or written.

use std::path::PathBuf;
use std::sync::Arc;

use crate::client::{NopClient, StorageClient};
use crate::error::{Result, StorageError};
use crate::extension::{ComponentId, StorageExtension};
use crate::file::FileStorage;
use crate::memory::MemoryStorage;

/// Named storage extensions registered in one process
#[derive(Clone, Default)]
pub struct StorageHost {
    extensions: Vec<(String, Arc<dyn StorageExtension>)>,
}

impl StorageHost {
    /// Create a host with no extensions
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an extension under `name`
    #[must_use]
    pub fn with_extension(
        mut self,
        name: impl Into<String>,
        extension: Arc<dyn StorageExtension>,
    ) -> Self {
        self.extensions.push((name.into(), extension));
        self
    }

    /// Add an in-memory extension
    #[must_use]
    pub fn with_in_memory_storage_extension(self, name: impl Into<String>) -> Self {
        self.with_extension(name, Arc::new(MemoryStorage::new()))
    }

    /// Add a file-backed extension storing under `directory`
    #[must_use]
    pub fn with_file_backed_storage_extension(
        self,
        name: impl Into<String>,
        directory: impl Into<PathBuf>,
    ) -> Self {
        self.with_extension(name, Arc::new(FileStorage::new(directory)))
    }

    /// Registered extensions in registration order
    pub fn extensions(&self) -> impl Iterator<Item = (&str, &Arc<dyn StorageExtension>)> {
        self.extensions.iter().map(|(n, e)| (n.as_str(), e))
    }

    /// Number of registered extensions
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Check if no extension is registered
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Shut down every extension, returning the first error
    ///
    /// All extensions are shut down even if one fails.
    pub async fn shutdown(&self) -> Result<()> {
        let mut first_error = None;
        for (name, extension) in &self.extensions {
            if let Err(e) = extension.shutdown().await {
                tracing::warn!(extension = %name, error = %e, "storage extension shutdown failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl std::fmt::Debug for StorageHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.extensions.iter().map(|(n, e)| format!("{n} ({})", e.kind())))
            .finish()
    }
}

/// Get the storage client for `component`
///
/// # Errors
///
/// - `MultipleExtensions` if more than one extension is registered
/// - whatever the extension returns when opening the client
pub async fn get_storage_client(
    host: &StorageHost,
    component: &ComponentId,
) -> Result<Arc<dyn StorageClient>> {
    match host.extensions.as_slice() {
        [] => {
            tracing::debug!(component = %component, "no storage extension, using no-op client");
            Ok(Arc::new(NopClient::new()))
        }
        [(name, extension)] => {
            tracing::debug!(
                component = %component,
                extension = %name,
                extension_kind = extension.kind(),
                "opening storage client"
            );
            extension.client(component).await
        }
        _ => Err(StorageError::MultipleExtensions),
    }
}
