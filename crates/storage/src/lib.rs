//! telroute Storage - byte-keyed persistence for components
//!
//! Components that keep state across restarts (offsets, checkpoints) get a
//! `StorageClient` from the single storage extension registered in the
//! `StorageHost`.
//!
//! ```text
//! [StorageAdapter] --start(host)--> get_storage_client
//!                                      ├── no extension   → NopClient
//!                                      ├── one extension  → MemoryClient / FileClient
//!                                      └── two or more    → MultipleExtensions
//! ```
//!
//! # Example
//!
//! ```ignore
//! let host = StorageHost::new().with_file_backed_storage_extension("file", "/var/lib/telroute");
//!
//! let mut adapter = StorageAdapter::new(ComponentKind::Receiver, "filelog");
//! adapter.start(&host).await?;
//! adapter.set("offset", Bytes::from_static(b"1024")).await?;
//! adapter.shutdown().await?;
//! ```

mod adapter;
mod client;
mod error;
mod extension;
mod file;
mod host;
mod memory;

pub use adapter::StorageAdapter;
pub use client::{NopClient, StorageClient};
pub use error::{Result, StorageError};
pub use extension::{ComponentId, ComponentKind, StorageExtension};
pub use file::{FileClient, FileStorage};
pub use host::{StorageHost, get_storage_client};
pub use memory::{MemoryClient, MemoryStorage};

pub use bytes::Bytes;

#[cfg(test)]
mod storage_test;
