//! Local filesystem disk driver.

use crate::{ByteSource, ByteStream, DiskCapabilities, DiskDriver};
use medley_error::StoreError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Disk rooted in a local directory.
///
/// Writes are atomic: bytes land in a temp file first and are renamed into
/// place, so a torn write is never visible at the target path. Headers are
/// ignored; the filesystem has nowhere to put them.
pub struct LocalDisk {
    root: PathBuf,
}

impl LocalDisk {
    /// Create a disk rooted at a directory, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be created or accessed.
    #[tracing::instrument(skip(root))]
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();

        std::fs::create_dir_all(&root)
            .map_err(|e| StoreError::from_io(root.display().to_string(), &e))?;

        tracing::info!(root = %root.display(), "Created local disk");
        Ok(Self { root })
    }

    fn absolute(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    async fn prepare_parent(&self, target: &Path) -> Result<(), StoreError> {
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::from_io(parent.display().to_string(), &e))?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DiskDriver for LocalDisk {
    fn capabilities(&self) -> DiskCapabilities {
        DiskCapabilities {
            implicit_directories: false,
            in_place_copy: true,
            custom_headers: false,
        }
    }

    #[tracing::instrument(skip(self, source, _headers), fields(root = %self.root.display()))]
    async fn write(
        &self,
        path: &str,
        source: ByteSource,
        _headers: &HashMap<String, String>,
    ) -> Result<(), StoreError> {
        let target = self.absolute(path);
        self.prepare_parent(&target).await?;

        // Write to temp file first, then rename for atomicity. The temp name
        // is unique so it can never clobber a stored object or collide with
        // a concurrent write to a stem-sharing path.
        let temp_path =
            target.with_file_name(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
        match source {
            ByteSource::Bytes(data) => {
                tokio::fs::write(&temp_path, data)
                    .await
                    .map_err(|e| StoreError::from_io(path, &e))?;
            }
            ByteSource::Reader(mut reader) => {
                let mut file = tokio::fs::File::create(&temp_path)
                    .await
                    .map_err(|e| StoreError::from_io(path, &e))?;
                tokio::io::copy(&mut reader, &mut file)
                    .await
                    .map_err(|e| StoreError::from_io(path, &e))?;
            }
            ByteSource::LocalFile(src) => {
                tokio::fs::copy(&src, &temp_path)
                    .await
                    .map_err(|e| StoreError::from_io(src.display().to_string(), &e))?;
            }
        }

        tokio::fs::rename(&temp_path, &target)
            .await
            .map_err(|e| StoreError::from_io(path, &e))?;

        tracing::debug!(path, "Stored object");
        Ok(())
    }

    async fn read_stream(&self, path: &str) -> Result<ByteStream, StoreError> {
        let file = tokio::fs::File::open(self.absolute(path))
            .await
            .map_err(|e| StoreError::from_io(path, &e))?;
        Ok(Box::new(file))
    }

    async fn copy(&self, src: &str, dst: &str) -> Result<(), StoreError> {
        let target = self.absolute(dst);
        self.prepare_parent(&target).await?;
        tokio::fs::copy(self.absolute(src), target)
            .await
            .map_err(|e| StoreError::from_io(src, &e))?;
        Ok(())
    }

    async fn rename(&self, src: &str, dst: &str) -> Result<(), StoreError> {
        let target = self.absolute(dst);
        self.prepare_parent(&target).await?;
        tokio::fs::rename(self.absolute(src), target)
            .await
            .map_err(|e| StoreError::from_io(src, &e))?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        tokio::fs::remove_file(self.absolute(path))
            .await
            .map_err(|e| StoreError::from_io(path, &e))
    }

    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    async fn delete_directory(&self, path: &str) -> Result<(), StoreError> {
        tokio::fs::remove_dir_all(self.absolute(path))
            .await
            .map_err(|e| StoreError::from_io(path, &e))?;
        tracing::debug!(path, "Removed directory");
        Ok(())
    }

    async fn list_files(&self, dir: &str) -> Result<Vec<String>, StoreError> {
        let base = self.absolute(dir);
        let mut pending = vec![base.clone()];
        let mut files = Vec::new();

        while let Some(current) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&current)
                .await
                .map_err(|e| StoreError::from_io(current.display().to_string(), &e))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| StoreError::from_io(current.display().to_string(), &e))?
            {
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| StoreError::from_io(current.display().to_string(), &e))?;
                let path = entry.path();
                if file_type.is_dir() {
                    pending.push(path);
                } else if let Ok(relative) = path.strip_prefix(&self.root) {
                    files.push(relative.to_string_lossy().replace('\\', "/"));
                }
            }
        }

        files.sort();
        Ok(files)
    }

    async fn ensure_directory(&self, path: &str) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(self.absolute(path))
            .await
            .map_err(|e| StoreError::from_io(path, &e))
    }

    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        Ok(tokio::fs::try_exists(self.absolute(path)).await.unwrap_or(false))
    }
}
