//! Derived artifact tracking types.

use serde::{Deserialize, Serialize};

/// Generation status of one (media item, conversion) pair.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum GenerationStatus {
    /// Not yet attempted, or invalidated by a rename
    #[default]
    #[display("pending")]
    Pending,
    /// Bytes are durably stored at the artifact path
    #[display("generated")]
    Generated,
    /// The last attempt failed; retried on the next explicit regeneration
    #[display("failed")]
    Failed,
}

/// A derived file belonging to exactly one (media item, conversion) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedArtifact {
    /// Name of the conversion that produced this artifact
    pub conversion: String,
    /// Storage path of the artifact on the conversions disk
    pub path: String,
    /// Current generation status
    pub status: GenerationStatus,
}

impl DerivedArtifact {
    /// Create a pending artifact record.
    pub fn pending(conversion: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            conversion: conversion.into(),
            path: path.into(),
            status: GenerationStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn new_artifacts_start_pending() {
        let artifact = DerivedArtifact::pending("thumb", "media/1/conversions/photo-thumb.png");
        assert_eq!(artifact.status, GenerationStatus::Pending);
        assert_eq!(artifact.status, GenerationStatus::default());
    }

    #[test]
    fn status_display_is_lowercase() {
        for status in GenerationStatus::iter() {
            let shown = status.to_string();
            assert_eq!(shown, shown.to_lowercase());
        }
    }
}
