//! Conversion engine boundary.

use medley_core::Manipulation;
use medley_error::{ConversionError, ConversionErrorKind};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// External collaborator applying manipulation steps to a source file.
///
/// Implementations own the pixel work (GD, Imagick, ffmpeg, whatever fits);
/// the pipeline only hands over a local source path and the ordered steps,
/// and expects a derived file it may rename and store.
#[async_trait::async_trait]
pub trait ConversionEngine: Send + Sync {
    /// Apply the steps to the source, producing a new local file.
    ///
    /// The returned path must be a sibling of (or otherwise live as long as)
    /// the source; the pipeline renames it before storing.
    async fn apply(
        &self,
        source: &Path,
        steps: &[Manipulation],
    ) -> Result<PathBuf, ConversionError>;
}

/// Engine that copies bytes unchanged.
///
/// Useful when conversions only exist to fan a file out under several names,
/// and as the engine stand-in in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughEngine;

impl PassthroughEngine {
    /// Create a passthrough engine.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ConversionEngine for PassthroughEngine {
    async fn apply(
        &self,
        source: &Path,
        _steps: &[Manipulation],
    ) -> Result<PathBuf, ConversionError> {
        let directory = source.parent().ok_or_else(|| {
            ConversionError::new(ConversionErrorKind::EngineFailure(format!(
                "source has no parent directory: {}",
                source.display()
            )))
        })?;
        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let target = directory.join(format!("{}-{}", Uuid::new_v4().simple(), file_name));

        tokio::fs::copy(source, &target).await.map_err(|e| {
            ConversionError::new(ConversionErrorKind::EngineFailure(format!(
                "{}: {}",
                source.display(),
                e
            )))
        })?;

        Ok(target)
    }
}
