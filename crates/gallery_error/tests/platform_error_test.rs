//! Tests for platform error kinds and their conversion.

use gallery_error::{GalleryError, GalleryErrorKind, PlatformError, PlatformErrorKind};

// Exhaustive so a new kind has to be given a message here.
fn describe(kind: &PlatformErrorKind) -> &'static str {
    match kind {
        PlatformErrorKind::Api(_) => "api",
        PlatformErrorKind::InsufficientPermissions(_) => "permissions",
        PlatformErrorKind::RateLimited(_) => "rate limit",
        PlatformErrorKind::ConnectionFailed(_) => "connection",
        PlatformErrorKind::InvalidToken => "token",
        PlatformErrorKind::TaskFailed(_) => "task",
    }
}

#[test]
fn test_platform_error_kinds_display() {
    let cases = [
        (
            PlatformErrorKind::Api("500 Internal Server Error".to_string()),
            "Platform API error: 500 Internal Server Error",
        ),
        (
            PlatformErrorKind::InsufficientPermissions("Manage Messages".to_string()),
            "Insufficient permissions: Manage Messages",
        ),
        (
            PlatformErrorKind::RateLimited(3),
            "Rate limit exceeded: retry after 3s",
        ),
        (
            PlatformErrorKind::ConnectionFailed("gateway closed".to_string()),
            "Connection failed: gateway closed",
        ),
        (PlatformErrorKind::InvalidToken, "Invalid or expired bot token"),
        (
            PlatformErrorKind::TaskFailed("task 7 panicked".to_string()),
            "Task failed: task 7 panicked",
        ),
    ];

    for (kind, expected) in cases {
        assert!(!describe(&kind).is_empty());
        assert_eq!(kind.to_string(), expected);
    }
}

#[test]
fn test_platform_error_records_caller_location() {
    let err = PlatformError::new(PlatformErrorKind::InvalidToken);

    assert!(err.file().ends_with("platform_error_test.rs"));
    assert!(*err.line() > 0);
    assert!(err.to_string().contains("Invalid or expired bot token"));
}

#[test]
fn test_platform_error_converts_into_gallery_error() {
    let err: GalleryError = PlatformError::new(PlatformErrorKind::RateLimited(1)).into();

    match err.kind() {
        GalleryErrorKind::Platform(inner) => {
            assert_eq!(inner.kind(), &PlatformErrorKind::RateLimited(1));
        }
        other => panic!("unexpected kind: {:?}", other),
    }
}
