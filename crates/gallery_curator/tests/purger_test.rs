//! Tests for batched deletion.

mod common;

use common::{DeleteCall, MockPlatform};
use gallery_core::{ChannelId, MessageId};
use gallery_curator::{BatchPurger, MAX_BULK_DELETE};
use std::time::Duration;
use tokio::time::Instant;

fn ids(count: u64) -> Vec<MessageId> {
    (1..=count).map(MessageId).collect()
}

#[tokio::test(start_paused = true)]
async fn test_purge_batches_of_one_hundred_with_pacing() {
    let platform = MockPlatform::new();
    let purger = BatchPurger::new(Duration::from_secs(1));

    let started = Instant::now();
    let report = purger.purge(&platform, ChannelId(1), &ids(250)).await.unwrap();

    assert_eq!(*report.deleted(), 250);
    assert_eq!(*report.batches(), 3);

    let sizes: Vec<usize> = platform
        .deletes
        .lock()
        .iter()
        .map(|call| match call {
            DeleteCall::Bulk(_, ids) => ids.len(),
            DeleteCall::Single(_, _) => 1,
        })
        .collect();
    assert_eq!(sizes, vec![MAX_BULK_DELETE, MAX_BULK_DELETE, 50]);
    assert_eq!(started.elapsed(), Duration::from_secs(2));
}

#[tokio::test]
async fn test_single_message_uses_single_delete() {
    let platform = MockPlatform::new();
    let purger = BatchPurger::new(Duration::ZERO);

    let report = purger.purge(&platform, ChannelId(1), &ids(1)).await.unwrap();

    assert_eq!(*report.batches(), 1);
    assert_eq!(
        platform.deletes.lock().clone(),
        vec![DeleteCall::Single(ChannelId(1), MessageId(1))]
    );
}

#[tokio::test]
async fn test_lone_trailing_message_uses_single_delete() {
    let platform = MockPlatform::new();
    let purger = BatchPurger::new(Duration::ZERO);

    purger.purge(&platform, ChannelId(1), &ids(101)).await.unwrap();

    let calls = platform.deletes.lock().clone();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1], DeleteCall::Single(ChannelId(1), MessageId(101)));
}

#[tokio::test]
async fn test_empty_list_issues_nothing() {
    let platform = MockPlatform::new();
    let report = BatchPurger::default()
        .purge(&platform, ChannelId(1), &[])
        .await
        .unwrap();

    assert_eq!(*report.deleted(), 0);
    assert!(platform.deletes.lock().is_empty());
}

#[tokio::test]
async fn test_delete_failure_aborts_purge() {
    let platform = MockPlatform::new().with_failing_deletes();
    let purger = BatchPurger::new(Duration::ZERO);

    let result = purger.purge(&platform, ChannelId(1), &ids(5)).await;

    assert!(result.is_err());
    assert!(platform.deletes.lock().is_empty());
}
