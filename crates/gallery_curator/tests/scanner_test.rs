//! Tests for the channel scanner window.

mod common;

use chrono::{Duration, Utc};
use common::{GUILD, MockPlatform, build, text_message};
use gallery_core::{ChannelConfig, ChannelId, MessageId, StaffRoles};
use gallery_curator::{RetentionPolicy, ScanWindow, scan_channel};

fn policy(expiration_secs: u64) -> RetentionPolicy {
    let config = ChannelConfig::builder()
        .enabled(true)
        .expiration_secs(expiration_secs)
        .build()
        .unwrap();
    RetentionPolicy::new(GUILD, config, &StaffRoles::default())
}

#[test]
fn test_window_bounds() {
    let now = Utc::now();
    let window = ScanWindow::at(now, 3_600).expect("Non-empty window");

    assert_eq!(window.before, now - Duration::hours(1));
    assert_eq!(window.after, now - Duration::days(14) + Duration::seconds(30));
    assert!(window.contains(now - Duration::days(3)));
    assert!(!window.contains(now - Duration::minutes(5)));
    assert!(!window.contains(now - Duration::days(15)));
}

#[test]
fn test_window_empty_when_expiration_reaches_bound() {
    let now = Utc::now();
    assert!(ScanWindow::at(now, 14 * 24 * 3_600).is_none());
    assert!(ScanWindow::at(now, 14 * 24 * 3_600 - 30).is_none());
    assert!(ScanWindow::at(now, u64::MAX).is_none());
    assert!(ScanWindow::at(now, 14 * 24 * 3_600 - 31).is_some());
}

#[tokio::test]
async fn test_scan_collects_only_expired_deletable_messages() {
    let platform = MockPlatform::new().with_channel(1, "gallery").with_messages(
        1,
        vec![
            build(text_message(1, 1, 5, 1).content("too young")),
            build(text_message(2, 1, 5, 72).content("old chatter")),
            build(text_message(3, 1, 5, 80).has_attachment_or_embed(true)),
            build(text_message(4, 1, 5, 100).content("more chatter")),
        ],
    );

    let outcome = scan_channel(&platform, ChannelId(1), &policy(48 * 3_600), Utc::now())
        .await
        .unwrap();

    assert_eq!(*outcome.examined(), 3);
    assert_eq!(outcome.deletions(), &vec![MessageId(2), MessageId(4)]);
}

#[tokio::test]
async fn test_messages_past_bulk_window_never_collected() {
    let platform = MockPlatform::new().with_channel(1, "gallery").with_messages(
        1,
        vec![
            build(&text_message(1, 1, 5, 24 * 13)),
            build(&text_message(2, 1, 5, 24 * 14)),
            build(&text_message(3, 1, 5, 24 * 20)),
        ],
    );

    let outcome = scan_channel(&platform, ChannelId(1), &policy(3_600), Utc::now())
        .await
        .unwrap();

    assert_eq!(outcome.into_deletions(), vec![MessageId(1)]);
}

#[tokio::test]
async fn test_empty_window_skips_history() {
    let platform = MockPlatform::new()
        .with_channel(1, "gallery")
        .with_messages(1, vec![build(&text_message(1, 1, 5, 24 * 15))]);

    let outcome = scan_channel(&platform, ChannelId(1), &policy(15 * 24 * 3_600), Utc::now())
        .await
        .unwrap();

    assert!(outcome.deletions().is_empty());
    assert!(platform.history_requests.lock().is_empty());
}

#[tokio::test]
async fn test_history_error_propagates() {
    let platform = MockPlatform::new().with_channel(1, "gallery").with_failing_history(1);

    let result = scan_channel(&platform, ChannelId(1), &policy(3_600), Utc::now()).await;

    assert!(result.is_err());
}
