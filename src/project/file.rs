//! File entries and the collaborators that turn them into bytes.

use anyhow::Context;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One servable file in the path map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Declared MIME type; `None` is served as `text/plain`
    pub content_type: Option<String>,
    /// Where the reader finds the bytes
    pub source: PathBuf,
}

impl FileEntry {
    pub fn new(source: impl Into<PathBuf>, content_type: Option<String>) -> Self {
        Self {
            content_type,
            source: source.into(),
        }
    }
}

/// Bytes read for a [`FileEntry`].
#[derive(Debug, Clone)]
pub struct FileContents {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// Reads the contents of path-map entries.
///
/// Implementations must not block the runtime thread.
#[async_trait::async_trait]
pub trait FileReader: Send + Sync + 'static {
    async fn read(&self, entry: &FileEntry) -> anyhow::Result<FileContents>;
}

/// Reads entries from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFileReader;

#[async_trait::async_trait]
impl FileReader for DiskFileReader {
    async fn read(&self, entry: &FileEntry) -> anyhow::Result<FileContents> {
        let bytes = tokio::fs::read(&entry.source)
            .await
            .with_context(|| format!("Failed to read {}", entry.source.display()))?;

        Ok(FileContents {
            bytes: Bytes::from(bytes),
            content_type: entry.content_type.clone(),
        })
    }
}

/// Serves entries from bytes held in memory, keyed by source path.
///
/// For embedders that preview content which is not on disk, such as unsaved
/// editor buffers or generated pages.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileReader {
    files: Arc<RwLock<HashMap<PathBuf, Bytes>>>,
}

impl MemoryFileReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the bytes for a source path.
    pub async fn insert(&self, source: impl Into<PathBuf>, bytes: impl Into<Bytes>) {
        self.files.write().await.insert(source.into(), bytes.into());
    }

    pub async fn remove(&self, source: impl Into<PathBuf>) -> Option<Bytes> {
        self.files.write().await.remove(&source.into())
    }
}

#[async_trait::async_trait]
impl FileReader for MemoryFileReader {
    async fn read(&self, entry: &FileEntry) -> anyhow::Result<FileContents> {
        let files = self.files.read().await;
        let bytes = files
            .get(&entry.source)
            .cloned()
            .with_context(|| format!("No contents registered for {}", entry.source.display()))?;

        Ok(FileContents {
            bytes,
            content_type: entry.content_type.clone(),
        })
    }
}
