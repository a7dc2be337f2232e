//! Ingest result reporting.

use derive_getters::Getters;
use medley_error::ConversionFailure;

/// Outcome of one ingest or regeneration run.
///
/// A report with failures is still a successful operation: the original is
/// stored and every other conversion ran. Failed conversions are retried on
/// the next explicit regeneration request.
#[derive(Debug, Getters)]
pub struct IngestReport {
    /// Storage path of the original file
    original_path: String,
    /// Conversions whose artifacts were stored and marked generated
    generated: Vec<String>,
    /// Conversions that failed, with their reasons
    failed: Vec<ConversionFailure>,
}

impl IngestReport {
    pub(crate) fn new(
        original_path: String,
        generated: Vec<String>,
        failed: Vec<ConversionFailure>,
    ) -> Self {
        Self {
            original_path,
            generated,
            failed,
        }
    }

    /// True when every conversion produced its artifact.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
