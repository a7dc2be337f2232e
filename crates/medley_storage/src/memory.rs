//! In-memory disk driver with object-store semantics.

use crate::{ByteSource, ByteStream, DiskCapabilities, DiskDriver};
use medley_error::{StoreError, StoreErrorKind};
use std::collections::HashMap;
use tokio::io::AsyncReadExt;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    headers: HashMap<String, String>,
}

/// Disk holding objects in memory.
///
/// Mirrors object-store behavior: directories exist implicitly, objects
/// carry custom headers, and same-disk copies never leave the backend. Used
/// as the remote-disk stand-in in tests and embedded setups.
#[derive(Default)]
pub struct MemoryDisk {
    objects: Mutex<HashMap<String, StoredObject>>,
}

impl MemoryDisk {
    /// Create an empty disk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Headers stored with an object, for assertions and diagnostics.
    pub async fn headers_of(&self, path: &str) -> Option<HashMap<String, String>> {
        let objects = self.objects.lock().await;
        objects.get(normalize(path)).map(|o| o.headers.clone())
    }
}

fn normalize(path: &str) -> &str {
    path.trim_start_matches('/')
}

fn directory_prefix(path: &str) -> String {
    let trimmed = normalize(path).trim_end_matches('/');
    format!("{trimmed}/")
}

#[async_trait::async_trait]
impl DiskDriver for MemoryDisk {
    fn capabilities(&self) -> DiskCapabilities {
        DiskCapabilities {
            implicit_directories: true,
            in_place_copy: true,
            custom_headers: true,
        }
    }

    async fn write(
        &self,
        path: &str,
        source: ByteSource,
        headers: &HashMap<String, String>,
    ) -> Result<(), StoreError> {
        let data = match source {
            ByteSource::Bytes(data) => data,
            ByteSource::Reader(mut reader) => {
                let mut data = Vec::new();
                reader
                    .read_to_end(&mut data)
                    .await
                    .map_err(|e| StoreError::from_io(path, &e))?;
                data
            }
            ByteSource::LocalFile(src) => tokio::fs::read(&src)
                .await
                .map_err(|e| StoreError::from_io(src.display().to_string(), &e))?,
        };

        let mut objects = self.objects.lock().await;
        objects.insert(
            normalize(path).to_string(),
            StoredObject {
                data,
                headers: headers.clone(),
            },
        );
        Ok(())
    }

    async fn read_stream(&self, path: &str) -> Result<ByteStream, StoreError> {
        let objects = self.objects.lock().await;
        let object = objects
            .get(normalize(path))
            .ok_or_else(|| StoreError::new(StoreErrorKind::NotFound(path.to_string())))?;
        Ok(Box::new(std::io::Cursor::new(object.data.clone())))
    }

    async fn copy(&self, src: &str, dst: &str) -> Result<(), StoreError> {
        let mut objects = self.objects.lock().await;
        let object = objects
            .get(normalize(src))
            .cloned()
            .ok_or_else(|| StoreError::new(StoreErrorKind::NotFound(src.to_string())))?;
        objects.insert(normalize(dst).to_string(), object);
        Ok(())
    }

    async fn rename(&self, src: &str, dst: &str) -> Result<(), StoreError> {
        let mut objects = self.objects.lock().await;
        let object = objects
            .remove(normalize(src))
            .ok_or_else(|| StoreError::new(StoreErrorKind::NotFound(src.to_string())))?;
        objects.insert(normalize(dst).to_string(), object);
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        let mut objects = self.objects.lock().await;
        objects
            .remove(normalize(path))
            .ok_or_else(|| StoreError::new(StoreErrorKind::NotFound(path.to_string())))?;
        Ok(())
    }

    async fn delete_directory(&self, path: &str) -> Result<(), StoreError> {
        // Prefix removal; an empty prefix is already gone, which is success.
        let prefix = directory_prefix(path);
        let mut objects = self.objects.lock().await;
        objects.retain(|key, _| !key.starts_with(&prefix));
        Ok(())
    }

    async fn list_files(&self, dir: &str) -> Result<Vec<String>, StoreError> {
        let prefix = directory_prefix(dir);
        let objects = self.objects.lock().await;
        let mut files: Vec<String> = objects
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();
        files.sort();
        Ok(files)
    }

    async fn ensure_directory(&self, _path: &str) -> Result<(), StoreError> {
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        let objects = self.objects.lock().await;
        Ok(objects.contains_key(normalize(path)))
    }
}
