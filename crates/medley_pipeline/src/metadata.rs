//! Metadata store boundary.

use medley_core::{Conversion, DerivedArtifact, GenerationStatus, MediaId, MediaItem};
use medley_error::MedleyResult;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// External collaborator owning media metadata.
///
/// The pipeline reads the configured conversions from here and calls back to
/// record per-(media, conversion) artifact records. Persistence is the
/// implementor's business; a database-backed store and the in-memory one
/// below are interchangeable.
#[async_trait::async_trait]
pub trait MetadataStore: Send + Sync {
    /// Conversions configured for this media item.
    async fn conversions_for(&self, media: &MediaItem) -> MedleyResult<Vec<Conversion>>;

    /// Current status of one (media, conversion) pair.
    ///
    /// Unknown pairs are `Pending`.
    async fn status(&self, media: &MediaId, conversion: &str) -> MedleyResult<GenerationStatus>;

    /// Artifact records for a media item, ordered by conversion name.
    async fn artifacts_for(&self, media: &MediaId) -> MedleyResult<Vec<DerivedArtifact>>;

    /// Record that an artifact's bytes are durably stored at `path`.
    async fn mark_generated(
        &self,
        media: &MediaId,
        conversion: &str,
        path: &str,
    ) -> MedleyResult<()>;

    /// Record a failed attempt, retried on the next explicit regeneration.
    async fn mark_failed(&self, media: &MediaId, conversion: &str) -> MedleyResult<()>;
}

/// Metadata store backed by process memory.
#[derive(Default)]
pub struct InMemoryMetadataStore {
    conversions: Mutex<Vec<Conversion>>,
    artifacts: Mutex<HashMap<(MediaId, String), DerivedArtifact>>,
}

impl InMemoryMetadataStore {
    /// Create an empty store with no configured conversions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store applying the same conversions to every media item.
    pub fn with_conversions(conversions: Vec<Conversion>) -> Self {
        Self {
            conversions: Mutex::new(conversions),
            artifacts: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the configured conversions.
    pub async fn set_conversions(&self, conversions: Vec<Conversion>) {
        *self.conversions.lock().await = conversions;
    }
}

#[async_trait::async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn conversions_for(&self, _media: &MediaItem) -> MedleyResult<Vec<Conversion>> {
        Ok(self.conversions.lock().await.clone())
    }

    async fn status(&self, media: &MediaId, conversion: &str) -> MedleyResult<GenerationStatus> {
        let artifacts = self.artifacts.lock().await;
        Ok(artifacts
            .get(&(media.clone(), conversion.to_string()))
            .map(|artifact| artifact.status)
            .unwrap_or_default())
    }

    async fn artifacts_for(&self, media: &MediaId) -> MedleyResult<Vec<DerivedArtifact>> {
        let artifacts = self.artifacts.lock().await;
        let mut records: Vec<DerivedArtifact> = artifacts
            .iter()
            .filter(|((id, _), _)| id == media)
            .map(|(_, artifact)| artifact.clone())
            .collect();
        records.sort_by(|a, b| a.conversion.cmp(&b.conversion));
        Ok(records)
    }

    async fn mark_generated(
        &self,
        media: &MediaId,
        conversion: &str,
        path: &str,
    ) -> MedleyResult<()> {
        let mut artifacts = self.artifacts.lock().await;
        artifacts.insert(
            (media.clone(), conversion.to_string()),
            DerivedArtifact {
                conversion: conversion.to_string(),
                path: path.to_string(),
                status: GenerationStatus::Generated,
            },
        );
        Ok(())
    }

    async fn mark_failed(&self, media: &MediaId, conversion: &str) -> MedleyResult<()> {
        let mut artifacts = self.artifacts.lock().await;
        let key = (media.clone(), conversion.to_string());
        // A failed retry keeps the last known path, if any.
        let path = artifacts
            .get(&key)
            .map(|artifact| artifact.path.clone())
            .unwrap_or_default();
        artifacts.insert(
            key,
            DerivedArtifact {
                conversion: conversion.to_string(),
                path,
                status: GenerationStatus::Failed,
            },
        );
        Ok(())
    }
}
