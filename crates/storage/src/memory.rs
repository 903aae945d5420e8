//! In-memory storage extension
//!
//! Data lives as long as the extension. Clients opened for the same
//! component share one map; nothing survives a process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::client::{ClosedFlag, StorageClient};
use crate::error::Result;
use crate::extension::{ComponentId, StorageExtension};

type Entries = Arc<Mutex<HashMap<String, Bytes>>>;

/// Storage extension keeping entries in memory
#[derive(Debug, Default)]
pub struct MemoryStorage {
    components: Mutex<HashMap<ComponentId, Entries>>,
}

impl MemoryStorage {
    /// Create an empty in-memory extension
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageExtension for MemoryStorage {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn client(&self, component: &ComponentId) -> Result<Arc<dyn StorageClient>> {
        let entries = Arc::clone(
            self.components
                .lock()
                .entry(component.clone())
                .or_default(),
        );
        Ok(Arc::new(MemoryClient {
            entries,
            closed: ClosedFlag::default(),
        }))
    }

    async fn shutdown(&self) -> Result<()> {
        self.components.lock().clear();
        Ok(())
    }
}

/// Client over one component's in-memory map
#[derive(Debug)]
pub struct MemoryClient {
    entries: Entries,
    closed: ClosedFlag,
}

#[async_trait]
impl StorageClient for MemoryClient {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        self.closed.check()?;
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<()> {
        self.closed.check()?;
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.closed.check()?;
        self.entries.lock().remove(key);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.closed.close();
        Ok(())
    }
}
