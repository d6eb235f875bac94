//! Chat platform error types.
//!
//! Errors raised by the host platform client: API failures, revoked
//! permissions, gateway trouble and failed background tasks.

use derive_getters::Getters;

/// Chat platform error variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum PlatformErrorKind {
    /// Platform API error (HTTP error, gateway error).
    #[display("Platform API error: {_0}")]
    Api(String),

    /// Bot lacks required permissions for an operation.
    #[display("Insufficient permissions: {_0}")]
    InsufficientPermissions(String),

    /// Rate limit exceeded.
    #[display("Rate limit exceeded: retry after {_0}s")]
    RateLimited(u64),

    /// Connection to the platform gateway failed.
    #[display("Connection failed: {_0}")]
    ConnectionFailed(String),

    /// Bot token is invalid or expired.
    #[display("Invalid or expired bot token")]
    InvalidToken,

    /// A background task died before reporting a result.
    #[display("Task failed: {_0}")]
    TaskFailed(String),
}

/// Platform error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Platform Error: {} at line {} in {}", kind, line, file)]
pub struct PlatformError {
    kind: PlatformErrorKind,
    line: u32,
    #[getter(skip)]
    file: &'static str,
}

impl PlatformError {
    /// Get field `file` from instance of `PlatformError`.
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// Create a new PlatformError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use gallery_error::{PlatformError, PlatformErrorKind};
    ///
    /// let err = PlatformError::new(PlatformErrorKind::InvalidToken);
    /// assert_eq!(err.kind(), &PlatformErrorKind::InvalidToken);
    /// ```
    #[track_caller]
    pub fn new(kind: PlatformErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
