//! Conversion engine error types.

/// Kinds of conversion errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ConversionErrorKind {
    /// The engine cannot produce or consume the requested format
    #[display("Unsupported format: {}", _0)]
    UnsupportedFormat(String),
    /// The engine failed while applying manipulations
    #[display("Engine failure: {}", _0)]
    EngineFailure(String),
}

/// Conversion error with location tracking.
///
/// # Examples
///
/// ```
/// use medley_error::{ConversionError, ConversionErrorKind};
///
/// let err = ConversionError::new(ConversionErrorKind::UnsupportedFormat("tiff".to_string()));
/// assert!(format!("{}", err).contains("Unsupported format"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Conversion Error: {} at line {} in {}", kind, line, file)]
pub struct ConversionError {
    /// The kind of error that occurred
    pub kind: ConversionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ConversionError {
    /// Create a new conversion error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ConversionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
