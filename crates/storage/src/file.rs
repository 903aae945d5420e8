//! File-backed storage extension
//!
//! Each component gets one file, `<directory>/<kind>_<escaped name>`, holding a
//! snapshot of all its entries. Every write re-encodes the snapshot into a
//! temp file and renames it over the old one, so a crash leaves either the
//! old or the new snapshot, never a torn one.
//!
//! # Snapshot Format
//!
//! ```text
//! magic "TRST" (4) | version u8 | count u32
//! count × ( key_len u32 | key (utf-8) | value_len u32 | value )
//! ```
//!
//! All integers are big-endian.

use std::collections::HashMap;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio::fs;
use tokio::sync::Mutex;

use crate::client::{ClosedFlag, StorageClient};
use crate::error::{Result, StorageError};
use crate::extension::{ComponentId, StorageExtension};

const MAGIC: &[u8; 4] = b"TRST";
const FORMAT_VERSION: u8 = 1;
const HEADER_LEN: usize = 4 + 1 + 4;

/// Storage extension persisting entries under a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    /// Create an extension storing files under `directory`
    ///
    /// The directory is created when the first client is opened.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Directory holding the component files
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file backing `component`
    pub fn path_for(&self, component: &ComponentId) -> PathBuf {
        self.directory.join(component.file_name())
    }
}

#[async_trait]
impl StorageExtension for FileStorage {
    fn kind(&self) -> &'static str {
        "file"
    }

    async fn client(&self, component: &ComponentId) -> Result<Arc<dyn StorageClient>> {
        fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| StorageError::io(&self.directory, e))?;

        let client = FileClient::open(self.path_for(component)).await?;
        Ok(Arc::new(client))
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

/// Client over one component's snapshot file
///
/// Entries are cached in memory; the lock is held across the file write so
/// snapshots hit the disk in the order the writes were applied. A write that
/// fails to persist is rolled back in memory too.
#[derive(Debug)]
pub struct FileClient {
    path: PathBuf,
    entries: Mutex<HashMap<String, Bytes>>,
    closed: ClosedFlag,
}

impl FileClient {
    /// Open the client, loading the existing snapshot if there is one
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read(&path).await {
            Ok(data) => decode_snapshot(Bytes::from(data))
                .map_err(|message| StorageError::corrupt(&path, message))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StorageError::io(&path, e)),
        };

        tracing::debug!(
            path = %path.display(),
            entries = entries.len(),
            "opened file storage client"
        );

        Ok(Self {
            path,
            entries: Mutex::new(entries),
            closed: ClosedFlag::default(),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &HashMap<String, Bytes>) -> Result<()> {
        let mut temp_path = OsString::from(self.path.as_os_str());
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        fs::write(&temp_path, encode_snapshot(entries))
            .await
            .map_err(|e| StorageError::io(&temp_path, e))?;

        // Atomic rename
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))
    }
}

#[async_trait]
impl StorageClient for FileClient {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        self.closed.check()?;
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<()> {
        self.closed.check()?;
        let mut entries = self.entries.lock().await;
        let previous = entries.insert(key.to_string(), value);
        if let Err(e) = self.persist(&entries).await {
            match previous {
                Some(value) => entries.insert(key.to_string(), value),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.closed.check()?;
        let mut entries = self.entries.lock().await;
        let Some(previous) = entries.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.persist(&entries).await {
            entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if self.closed.close() {
            tracing::debug!(path = %self.path.display(), "closed file storage client");
        }
        Ok(())
    }
}

// ============================================================================
// Snapshot codec
// ============================================================================

/// Encode entries, sorted by key so equal maps give equal files
fn encode_snapshot(entries: &HashMap<String, Bytes>) -> Bytes {
    let mut keys: Vec<&String> = entries.keys().collect();
    keys.sort();

    let body: usize = entries.iter().map(|(k, v)| 8 + k.len() + v.len()).sum();
    let mut buf = BytesMut::with_capacity(HEADER_LEN + body);

    buf.put_slice(MAGIC);
    buf.put_u8(FORMAT_VERSION);
    buf.put_u32(entries.len() as u32);
    for key in keys {
        let value = &entries[key];
        buf.put_u32(key.len() as u32);
        buf.put_slice(key.as_bytes());
        buf.put_u32(value.len() as u32);
        buf.put_slice(value);
    }

    buf.freeze()
}

fn decode_snapshot(mut buf: Bytes) -> std::result::Result<HashMap<String, Bytes>, String> {
    if buf.remaining() < HEADER_LEN {
        return Err("truncated header".into());
    }
    if &buf[..4] != MAGIC {
        return Err("bad magic".into());
    }
    buf.advance(4);

    let version = buf.get_u8();
    if version != FORMAT_VERSION {
        return Err(format!("unsupported format version {version}"));
    }

    let count = buf.get_u32() as usize;
    let mut entries = HashMap::with_capacity(count.min(1024));
    for _ in 0..count {
        let key = decode_field(&mut buf, "key")?;
        let key = String::from_utf8(key.to_vec()).map_err(|e| format!("invalid UTF-8 key: {e}"))?;
        let value = decode_field(&mut buf, "value")?;
        entries.insert(key, value);
    }

    if buf.has_remaining() {
        return Err(format!("{} trailing bytes", buf.remaining()));
    }
    Ok(entries)
}

fn decode_field(buf: &mut Bytes, what: &str) -> std::result::Result<Bytes, String> {
    if buf.remaining() < 4 {
        return Err(format!("truncated {what} length"));
    }
    let len = buf.get_u32() as usize;
    if buf.remaining() < len {
        return Err(format!("truncated {what}"));
    }
    Ok(buf.split_to(len))
}
