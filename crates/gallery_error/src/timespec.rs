//! Duration expression errors.

/// Reasons a human-entered duration could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TimeSpecErrorKind {
    /// The unit token matched no entry in the unit table.
    #[display("Invalid unit: {}", _0)]
    InvalidUnit(String),

    /// The numeric part is not a non-negative decimal.
    #[display("Not a number: '{}'", _0)]
    InvalidNumber(String),
}

/// Duration parse error with location tracking.
///
/// # Examples
///
/// ```
/// use gallery_error::{TimeSpecError, TimeSpecErrorKind};
///
/// let err = TimeSpecError::new(TimeSpecErrorKind::InvalidNumber("1.2.3".to_string()));
/// assert!(err.is_invalid_number());
/// assert_eq!(err.kind().to_string(), "Not a number: '1.2.3'");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, derive_getters::Getters)]
#[display("TimeSpec Error: {} at line {} in {}", kind, line, file)]
pub struct TimeSpecError {
    kind: TimeSpecErrorKind,
    line: u32,
    file: &'static str,
}

impl TimeSpecError {
    /// Create a new duration error with caller location tracking.
    #[track_caller]
    pub fn new(kind: TimeSpecErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// True when the error is an unknown unit.
    pub fn is_invalid_unit(&self) -> bool {
        matches!(self.kind, TimeSpecErrorKind::InvalidUnit(_))
    }

    /// True when the error is a malformed number.
    pub fn is_invalid_number(&self) -> bool {
        matches!(self.kind, TimeSpecErrorKind::InvalidNumber(_))
    }
}
