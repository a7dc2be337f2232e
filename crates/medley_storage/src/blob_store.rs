//! Multi-disk blob store facade.

use crate::{ByteSource, ByteStream, DiskCapabilities, DiskDriver};
use medley_core::DiskId;
use medley_error::{StoreError, StoreErrorKind};
use std::collections::HashMap;
use std::sync::Arc;

/// A registry of named disks exposing the storage contract of the pipeline.
///
/// The store is stateless apart from the registry: all coordination between
/// components happens through storage side effects, never shared memory.
#[derive(Clone, Default)]
pub struct BlobStore {
    disks: HashMap<DiskId, Arc<dyn DiskDriver>>,
}

impl BlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a disk under a name.
    pub fn with_disk(mut self, id: impl Into<DiskId>, driver: impl DiskDriver + 'static) -> Self {
        let id = id.into();
        tracing::debug!(disk = %id, "Registered disk");
        self.disks.insert(id, Arc::new(driver));
        self
    }

    fn disk(&self, id: &DiskId) -> Result<&Arc<dyn DiskDriver>, StoreError> {
        self.disks.get(id).ok_or_else(|| {
            StoreError::new(StoreErrorKind::Unknown(format!(
                "no disk registered under '{id}'"
            )))
        })
    }

    /// Capability flags of a registered disk.
    pub fn capabilities(&self, id: &DiskId) -> Result<DiskCapabilities, StoreError> {
        Ok(self.disk(id)?.capabilities())
    }

    /// Write an object, replacing any previous bytes at the path.
    #[tracing::instrument(skip(self, source, headers), fields(disk = %disk))]
    pub async fn put(
        &self,
        path: &str,
        source: ByteSource,
        disk: &DiskId,
        headers: &HashMap<String, String>,
    ) -> Result<(), StoreError> {
        self.disk(disk)?.write(path, source, headers).await
    }

    /// Open an object for streaming reads.
    #[tracing::instrument(skip(self), fields(disk = %disk))]
    pub async fn get_stream(&self, path: &str, disk: &DiskId) -> Result<ByteStream, StoreError> {
        self.disk(disk)?.read_stream(path).await
    }

    /// Copy an object within one disk.
    #[tracing::instrument(skip(self), fields(disk = %disk))]
    pub async fn copy(&self, src: &str, dst: &str, disk: &DiskId) -> Result<(), StoreError> {
        self.disk(disk)?.copy(src, dst).await
    }

    /// Move an object within one disk.
    #[tracing::instrument(skip(self), fields(disk = %disk))]
    pub async fn rename(&self, src: &str, dst: &str, disk: &DiskId) -> Result<(), StoreError> {
        self.disk(disk)?.rename(src, dst).await
    }

    /// Delete one object.
    #[tracing::instrument(skip(self), fields(disk = %disk))]
    pub async fn delete(&self, path: &str, disk: &DiskId) -> Result<(), StoreError> {
        self.disk(disk)?.delete(path).await
    }

    /// Delete a directory and everything under it.
    #[tracing::instrument(skip(self), fields(disk = %disk))]
    pub async fn delete_directory(&self, path: &str, disk: &DiskId) -> Result<(), StoreError> {
        self.disk(disk)?.delete_directory(path).await
    }

    /// List every object under a directory, recursively.
    pub async fn list_files(&self, dir: &str, disk: &DiskId) -> Result<Vec<String>, StoreError> {
        self.disk(disk)?.list_files(dir).await
    }

    /// Create a directory on disks with explicit directory semantics.
    ///
    /// No-op for disks advertising `implicit_directories`.
    pub async fn ensure_directory(&self, path: &str, disk: &DiskId) -> Result<(), StoreError> {
        let driver = self.disk(disk)?;
        if driver.capabilities().implicit_directories {
            return Ok(());
        }
        driver.ensure_directory(path).await
    }

    /// Whether an object exists at the path.
    pub async fn exists(&self, path: &str, disk: &DiskId) -> Result<bool, StoreError> {
        self.disk(disk)?.exists(path).await
    }
}

impl std::fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobStore")
            .field("disks", &self.disks.keys().collect::<Vec<_>>())
            .finish()
    }
}
