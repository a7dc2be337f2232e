//! Top-level error wrapper types.

use crate::{ArchiveError, ConversionError, PipelineError, StoreError};

/// This is the foundation error enum covering every Medley subsystem.
///
/// # Examples
///
/// ```
/// use medley_error::{MedleyError, StoreError, StoreErrorKind};
///
/// let store_err = StoreError::new(StoreErrorKind::Unknown("disk offline".to_string()));
/// let err: MedleyError = store_err.into();
/// assert!(format!("{}", err).contains("Store Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MedleyErrorKind {
    /// Blob store error
    #[from(StoreError)]
    Store(StoreError),
    /// Conversion engine error
    #[from(ConversionError)]
    Conversion(ConversionError),
    /// Derivation pipeline error
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// Archive streaming error
    #[from(ArchiveError)]
    Archive(ArchiveError),
}

/// Medley error with kind discrimination.
///
/// # Examples
///
/// ```
/// use medley_error::{MedleyResult, StoreError, StoreErrorKind};
///
/// fn might_fail() -> MedleyResult<()> {
///     Err(StoreError::new(StoreErrorKind::NotFound("media/9".to_string())))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Medley Error: {}", _0)]
pub struct MedleyError(Box<MedleyErrorKind>);

impl MedleyError {
    /// Create a new error from a kind.
    pub fn new(kind: MedleyErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MedleyErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to MedleyErrorKind
impl<T> From<T> for MedleyError
where
    T: Into<MedleyErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Medley operations.
///
/// # Examples
///
/// ```
/// use medley_error::{MedleyResult, ConversionError, ConversionErrorKind};
///
/// fn convert() -> MedleyResult<()> {
///     Err(ConversionError::new(ConversionErrorKind::EngineFailure("oom".to_string())))?
/// }
/// ```
pub type MedleyResult<T> = std::result::Result<T, MedleyError>;
