//! Disk driver trait and capability flags.

use medley_error::StoreError;
use std::collections::HashMap;
use std::path::PathBuf;

/// A readable stream of stored bytes.
///
/// Streams are scoped resources: callers must drop them on every exit path
/// before opening the next one.
pub type ByteStream = Box<dyn tokio::io::AsyncRead + Send + Unpin>;

/// Bytes flowing into a disk.
///
/// `LocalFile` lets drivers move already-materialized artifacts without an
/// extra copy through application memory.
pub enum ByteSource {
    /// An in-memory buffer
    Bytes(Vec<u8>),
    /// A stream pulled from elsewhere
    Reader(ByteStream),
    /// A file on the local filesystem
    LocalFile(PathBuf),
}

impl std::fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bytes(data) => f.debug_tuple("Bytes").field(&data.len()).finish(),
            Self::Reader(_) => f.debug_tuple("Reader").finish(),
            Self::LocalFile(path) => f.debug_tuple("LocalFile").field(path).finish(),
        }
    }
}

/// What a disk backend can do natively.
///
/// Callers branch on these flags instead of comparing driver names, so custom
/// backends behave correctly without code changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiskCapabilities {
    /// Directories exist implicitly (object stores); `ensure_directory` is a no-op
    pub implicit_directories: bool,
    /// Same-disk copies happen backend-side without streaming through the app
    pub in_place_copy: bool,
    /// Objects carry custom headers such as Content-Type
    pub custom_headers: bool,
}

/// One storage backend.
///
/// Paths are `/`-separated keys relative to the disk root. All failures
/// surface as [`StoreError`]; drivers never retry.
#[async_trait::async_trait]
pub trait DiskDriver: Send + Sync {
    /// Capability flags of this backend.
    fn capabilities(&self) -> DiskCapabilities;

    /// Write an object, replacing any previous bytes at the path.
    ///
    /// Headers are applied only by backends with the `custom_headers`
    /// capability; others ignore them.
    async fn write(
        &self,
        path: &str,
        source: ByteSource,
        headers: &HashMap<String, String>,
    ) -> Result<(), StoreError>;

    /// Open an object for streaming reads.
    async fn read_stream(&self, path: &str) -> Result<ByteStream, StoreError>;

    /// Copy an object within this disk.
    async fn copy(&self, src: &str, dst: &str) -> Result<(), StoreError>;

    /// Move an object within this disk.
    async fn rename(&self, src: &str, dst: &str) -> Result<(), StoreError>;

    /// Delete one object.
    async fn delete(&self, path: &str) -> Result<(), StoreError>;

    /// Delete a directory and everything under it.
    async fn delete_directory(&self, path: &str) -> Result<(), StoreError>;

    /// List every object under a directory, recursively.
    async fn list_files(&self, dir: &str) -> Result<Vec<String>, StoreError>;

    /// Create a directory if the backend has explicit directories.
    async fn ensure_directory(&self, path: &str) -> Result<(), StoreError>;

    /// Whether an object exists at the path.
    async fn exists(&self, path: &str) -> Result<bool, StoreError>;
}

#[async_trait::async_trait]
impl<T: DiskDriver + ?Sized> DiskDriver for std::sync::Arc<T> {
    fn capabilities(&self) -> DiskCapabilities {
        (**self).capabilities()
    }

    async fn write(
        &self,
        path: &str,
        source: ByteSource,
        headers: &HashMap<String, String>,
    ) -> Result<(), StoreError> {
        (**self).write(path, source, headers).await
    }

    async fn read_stream(&self, path: &str) -> Result<ByteStream, StoreError> {
        (**self).read_stream(path).await
    }

    async fn copy(&self, src: &str, dst: &str) -> Result<(), StoreError> {
        (**self).copy(src, dst).await
    }

    async fn rename(&self, src: &str, dst: &str) -> Result<(), StoreError> {
        (**self).rename(src, dst).await
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        (**self).delete(path).await
    }

    async fn delete_directory(&self, path: &str) -> Result<(), StoreError> {
        (**self).delete_directory(path).await
    }

    async fn list_files(&self, dir: &str) -> Result<Vec<String>, StoreError> {
        (**self).list_files(dir).await
    }

    async fn ensure_directory(&self, path: &str) -> Result<(), StoreError> {
        (**self).ensure_directory(path).await
    }

    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        (**self).exists(path).await
    }
}
