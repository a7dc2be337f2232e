//! The media item model.

use crate::{DiskId, MediaId};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// A media item accepted into the library.
///
/// Metadata persistence is owned by an external store; the pipeline only
/// reads these fields and reports conversion status back. The file name and
/// extension are immutable once derived files exist, except through the
/// rename operation which moves every generated artifact along with them.
///
/// # Examples
///
/// ```
/// use medley_core::MediaItem;
///
/// let media = MediaItem::new(1u64, "photo.png", "local");
/// assert_eq!(media.extension, "png");
/// assert_eq!(media.conversions_disk.as_str(), "local");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Opaque identity, the sole input to path generation
    pub id: MediaId,
    /// Original file name including extension, e.g. `photo.png`
    pub file_name: String,
    /// Extension of the original file, without the dot
    pub extension: String,
    /// Disk holding the original file
    pub disk: DiskId,
    /// Disk holding conversions and responsive variants
    pub conversions_disk: DiskId,
    /// Arbitrary caller-owned properties
    #[serde(default)]
    pub custom_properties: HashMap<String, JsonValue>,
    /// Per-item headers applied when storing on header-capable disks
    #[serde(default)]
    pub custom_headers: HashMap<String, String>,
}

impl MediaItem {
    /// Create a media item stored entirely on one disk.
    ///
    /// The extension is derived from the file name.
    pub fn new(id: impl Into<MediaId>, file_name: impl Into<String>, disk: impl Into<DiskId>) -> Self {
        let file_name = file_name.into();
        let disk = disk.into();
        Self {
            id: id.into(),
            extension: extension_of(&file_name),
            file_name,
            conversions_disk: disk.clone(),
            disk,
            custom_properties: HashMap::new(),
            custom_headers: HashMap::new(),
        }
    }

    /// Use a different disk for conversions and responsive variants.
    pub fn with_conversions_disk(mut self, disk: impl Into<DiskId>) -> Self {
        self.conversions_disk = disk.into();
        self
    }

    /// Attach a custom property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.custom_properties.insert(key.into(), value.into());
        self
    }

    /// Attach a custom header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.insert(key.into(), value.into());
        self
    }

    /// Rename the file, keeping the extension in sync.
    ///
    /// Callers holding generated artifacts must propagate the rename through
    /// the pipeline's `sync_file_names`, passing a snapshot taken before this
    /// call.
    pub fn rename(&mut self, file_name: impl Into<String>) {
        self.file_name = file_name.into();
        self.extension = extension_of(&self.file_name);
    }

    /// Look up a string-valued custom property.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.custom_properties.get(key).and_then(JsonValue::as_str)
    }
}

fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_tracks_rename() {
        let mut media = MediaItem::new(7u64, "clip.mp4", "local");
        assert_eq!(media.extension, "mp4");

        media.rename("clip.webm");
        assert_eq!(media.file_name, "clip.webm");
        assert_eq!(media.extension, "webm");
    }

    #[test]
    fn file_without_extension() {
        let media = MediaItem::new(8u64, "README", "local");
        assert_eq!(media.extension, "");
    }
}
