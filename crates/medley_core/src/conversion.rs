//! Conversion definitions.

use serde::{Deserialize, Serialize};

/// One step of a conversion's manipulation recipe.
///
/// The pixel work itself lives behind the `ConversionEngine` collaborator;
/// this vocabulary only describes what to do, in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Manipulation {
    /// Resize to exact dimensions
    Resize {
        /// Target width in pixels
        width: u32,
        /// Target height in pixels
        height: u32,
    },
    /// Scale to a width, preserving aspect ratio
    Width(u32),
    /// Scale to a height, preserving aspect ratio
    Height(u32),
    /// Re-encode into the named format, e.g. `png`
    Format(String),
    /// Encoding quality, 0-100
    Quality(u8),
}

/// A named transform applied to every ingested original.
///
/// The name is a stable identifier: it is both a storage-path component and
/// the key under which generation status is tracked, so it must be unique
/// among the conversions configured for one media item.
///
/// # Examples
///
/// ```
/// use medley_core::{Conversion, Manipulation};
///
/// let thumb = Conversion::new("thumb")
///     .add(Manipulation::Resize { width: 200, height: 200 })
///     .keep_original_format();
/// assert_eq!(thumb.name, "thumb");
/// assert!(!thumb.generate_responsive);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    /// Stable identifier, unique per media item
    pub name: String,
    /// Ordered manipulation steps
    pub manipulations: Vec<Manipulation>,
    /// Force the output format to match the original's extension
    pub keep_original_format: bool,
    /// Also derive a breakpoint-scaled family of responsive variants
    pub generate_responsive: bool,
}

impl Conversion {
    /// Create an empty conversion with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            manipulations: Vec::new(),
            keep_original_format: false,
            generate_responsive: false,
        }
    }

    /// Append a manipulation step.
    pub fn add(mut self, manipulation: Manipulation) -> Self {
        self.manipulations.push(manipulation);
        self
    }

    /// Keep the original image format when supported.
    pub fn keep_original_format(mut self) -> Self {
        self.keep_original_format = true;
        self
    }

    /// Also generate responsive variants from the converted result.
    pub fn with_responsive_images(mut self) -> Self {
        self.generate_responsive = true;
        self
    }

    /// The output format named by the recipe, if any.
    ///
    /// The last `Format` step wins, matching how engines apply steps in order.
    pub fn requested_format(&self) -> Option<&str> {
        self.manipulations.iter().rev().find_map(|step| match step {
            Manipulation::Format(format) => Some(format.as_str()),
            _ => None,
        })
    }
}
