//! Storage adapter - a component's handle on its storage client
//!
//! Obtains the client when the component starts and closes it when the
//! component shuts down. The closed client is kept, so late callers get
//! `client closed` rather than silently losing writes.

use std::sync::Arc;

use bytes::Bytes;

use crate::client::StorageClient;
use crate::error::{Result, StorageError};
use crate::extension::{ComponentId, ComponentKind};
use crate::host::{StorageHost, get_storage_client};

/// Storage handle owned by one component
pub struct StorageAdapter {
    component: ComponentId,
    client: Option<Arc<dyn StorageClient>>,
}

impl StorageAdapter {
    /// Create an adapter for the given component
    pub fn new(kind: ComponentKind, name: impl Into<String>) -> Self {
        Self {
            component: ComponentId::new(kind, name),
            client: None,
        }
    }

    /// The owning component
    pub fn component(&self) -> &ComponentId {
        &self.component
    }

    /// Obtain the storage client from the host
    ///
    /// A restarted adapter opens a fresh client, so file-backed data written
    /// before the restart is visible again.
    ///
    /// # Errors
    ///
    /// `MultipleExtensions` if the host has more than one storage extension.
    pub async fn start(&mut self, host: &StorageHost) -> Result<()> {
        let client = get_storage_client(host, &self.component).await?;
        self.client = Some(client);
        tracing::info!(component = %self.component, "storage adapter started");
        Ok(())
    }

    /// Close the storage client
    pub async fn shutdown(&mut self) -> Result<()> {
        if let Some(client) = &self.client {
            client.close().await?;
            tracing::info!(component = %self.component, "storage adapter stopped");
        }
        Ok(())
    }

    /// The current client, if started
    pub fn client(&self) -> Option<&Arc<dyn StorageClient>> {
        self.client.as_ref()
    }

    fn require_client(&self) -> Result<&Arc<dyn StorageClient>> {
        self.client.as_ref().ok_or(StorageError::NotStarted)
    }

    /// Get a value
    pub async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        self.require_client()?.get(key).await
    }

    /// Set a value
    pub async fn set(&self, key: &str, value: impl Into<Bytes>) -> Result<()> {
        self.require_client()?.set(key, value.into()).await
    }

    /// Delete a value
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.require_client()?.delete(key).await
    }
}

impl std::fmt::Debug for StorageAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageAdapter")
            .field("component", &self.component)
            .field("started", &self.client.is_some())
            .finish()
    }
}
