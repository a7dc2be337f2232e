//! References to files already living on a disk.

use crate::DiskId;
use serde::{Deserialize, Serialize};

/// Bytes already stored on some disk, not yet owned by the library.
///
/// Distinct from a `MediaItem`: when the source and destination share a disk
/// the pipeline may copy it in place instead of streaming it through the
/// application.
///
/// # Examples
///
/// ```
/// use medley_core::RemoteFile;
///
/// let remote = RemoteFile::new("uploads/2024/photo.png", "s3");
/// assert_eq!(remote.file_name(), "photo.png");
/// assert_eq!(remote.name(), "photo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteFile {
    key: String,
    disk: DiskId,
}

impl RemoteFile {
    /// Reference a file by its key on a disk.
    pub fn new(key: impl Into<String>, disk: impl Into<DiskId>) -> Self {
        Self {
            key: key.into(),
            disk: disk.into(),
        }
    }

    /// Full key of the file on its disk.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Disk the file lives on.
    pub fn disk(&self) -> &DiskId {
        &self.disk
    }

    /// Base name of the file, extension included.
    pub fn file_name(&self) -> &str {
        self.key.rsplit_once('/').map_or(self.key.as_str(), |(_, name)| name)
    }

    /// Base name of the file without its extension.
    pub fn name(&self) -> &str {
        let file_name = self.file_name();
        file_name.rsplit_once('.').map_or(file_name, |(stem, _)| stem)
    }
}
