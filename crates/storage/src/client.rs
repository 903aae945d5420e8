//! Storage client trait and the no-op client

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{Result, StorageError};

/// Byte-keyed store handed to one component
///
/// Every operation after `close()` fails with `StorageError::ClientClosed`.
/// `close()` itself is idempotent.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Get the value stored under `key`, or `None` if absent
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: Bytes) -> Result<()>;

    /// Remove `key`; removing an absent key succeeds
    async fn delete(&self, key: &str) -> Result<()>;

    /// Release the client
    async fn close(&self) -> Result<()>;
}

/// Open/closed flag shared by the client implementations
#[derive(Debug, Default)]
pub(crate) struct ClosedFlag(AtomicBool);

impl ClosedFlag {
    /// Fail with `ClientClosed` once closed
    #[inline]
    pub(crate) fn check(&self) -> Result<()> {
        if self.0.load(Ordering::Acquire) {
            Err(StorageError::ClientClosed)
        } else {
            Ok(())
        }
    }

    /// Mark closed; returns true on the first call
    #[inline]
    pub(crate) fn close(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }
}

/// Client used when no storage extension is configured
///
/// Nothing is stored: `get` always returns `None`, writes succeed.
#[derive(Debug, Default)]
pub struct NopClient {
    closed: ClosedFlag,
}

impl NopClient {
    /// Create a no-op client
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageClient for NopClient {
    async fn get(&self, _key: &str) -> Result<Option<Bytes>> {
        self.closed.check()?;
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Bytes) -> Result<()> {
        self.closed.check()
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        self.closed.check()
    }

    async fn close(&self) -> Result<()> {
        self.closed.close();
        Ok(())
    }
}
