//! Library configuration.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Configuration for the media library.
///
/// Passed explicitly at construction; there are no global lookups.
///
/// # Example
///
/// ```
/// use medley_core::LibraryConfig;
///
/// let config = LibraryConfig::default()
///     .with_responsive_widths(vec![640, 1280]);
/// assert!(config.keep_format_extensions().contains("png"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct LibraryConfig {
    /// Headers added to every object stored on a header-capable disk
    #[serde(default)]
    extra_remote_headers: HashMap<String, String>,

    /// Extensions for which `keep_original_format` is honored
    #[serde(default = "default_keep_format_extensions")]
    keep_format_extensions: HashSet<String>,

    /// Width breakpoints for responsive variant families, largest first
    #[serde(default = "default_responsive_widths")]
    responsive_widths: Vec<u32>,

    /// Custom property naming a per-item prefix for archive entries
    #[serde(default = "default_zip_prefix_property")]
    zip_prefix_property: String,
}

fn default_keep_format_extensions() -> HashSet<String> {
    ["jpg", "pjpg", "png", "gif"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_responsive_widths() -> Vec<u32> {
    vec![1920, 1280, 960, 640, 320]
}

fn default_zip_prefix_property() -> String {
    "zip_filename_prefix".to_string()
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            extra_remote_headers: HashMap::new(),
            keep_format_extensions: default_keep_format_extensions(),
            responsive_widths: default_responsive_widths(),
            zip_prefix_property: default_zip_prefix_property(),
        }
    }
}

impl LibraryConfig {
    /// Headers added to every object stored on a header-capable disk.
    pub fn extra_remote_headers(&self) -> &HashMap<String, String> {
        &self.extra_remote_headers
    }

    /// Extensions for which `keep_original_format` is honored.
    pub fn keep_format_extensions(&self) -> &HashSet<String> {
        &self.keep_format_extensions
    }

    /// Width breakpoints for responsive variant families.
    pub fn responsive_widths(&self) -> &[u32] {
        &self.responsive_widths
    }

    /// Custom property naming a per-item prefix for archive entries.
    pub fn zip_prefix_property(&self) -> &str {
        &self.zip_prefix_property
    }
}
