//! Deterministic storage path generation.

use crate::MediaItem;

/// Maps a media item to its storage directories.
///
/// Implementations must be pure and deterministic, and should derive paths
/// from the media identifier rather than the file name so that renames never
/// require moving sibling files.
pub trait PathGenerator: Send + Sync {
    /// Directory of the original file, with a trailing slash.
    fn path(&self, media: &MediaItem) -> String;

    /// Directory of conversion artifacts, with a trailing slash.
    fn path_for_conversions(&self, media: &MediaItem) -> String;

    /// Directory of responsive variants, with a trailing slash.
    fn path_for_responsive_images(&self, media: &MediaItem) -> String;
}

/// Id-based path generator: `{prefix}/{id}/`.
///
/// # Examples
///
/// ```
/// use medley_core::{DefaultPathGenerator, MediaItem, PathGenerator};
///
/// let paths = DefaultPathGenerator::default();
/// let media = MediaItem::new(1u64, "photo.png", "local");
/// assert_eq!(paths.path(&media), "media/1/");
/// assert_eq!(paths.path_for_conversions(&media), "media/1/conversions/");
/// assert_eq!(paths.path_for_responsive_images(&media), "media/1/responsive-images/");
/// ```
#[derive(Debug, Clone)]
pub struct DefaultPathGenerator {
    prefix: String,
}

impl DefaultPathGenerator {
    /// Use a custom root prefix instead of `media`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for DefaultPathGenerator {
    fn default() -> Self {
        Self::new("media")
    }
}

impl PathGenerator for DefaultPathGenerator {
    fn path(&self, media: &MediaItem) -> String {
        format!("{}/{}/", self.prefix, media.id)
    }

    fn path_for_conversions(&self, media: &MediaItem) -> String {
        format!("{}conversions/", self.path(media))
    }

    fn path_for_responsive_images(&self, media: &MediaItem) -> String {
        format!("{}responsive-images/", self.path(media))
    }
}
