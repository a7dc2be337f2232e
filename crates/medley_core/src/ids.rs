//! Identifier newtypes.

use serde::{Deserialize, Serialize};

/// Opaque identity of a media item.
///
/// Storage paths are derived from this identifier rather than from the file
/// name, so renaming a file never moves its siblings.
///
/// # Examples
///
/// ```
/// use medley_core::MediaId;
///
/// let id = MediaId::from(1u64);
/// assert_eq!(id.to_string(), "1");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub struct MediaId(String);

impl MediaId {
    /// View the identifier as a path-safe string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for MediaId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MediaId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MediaId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Name of a registered disk in the blob store.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub struct DiskId(String);

impl DiskId {
    /// View the disk name as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DiskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DiskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
