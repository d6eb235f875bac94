//! Tests for snowflake and timestamp conversion.

#![cfg(feature = "discord")]

use chrono::{DateTime, Duration, TimeZone, Utc};
use gallery_social::discord::{DISCORD_EPOCH_MS, snowflake_at, snowflake_time};

#[test]
fn test_snowflake_round_trip_keeps_millisecond() {
    let time = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();

    let id = snowflake_at(time);

    assert_eq!(snowflake_time(id), time);
}

#[test]
fn test_snowflake_time_of_known_message() {
    let expected = Utc.with_ymd_and_hms(2016, 4, 30, 11, 18, 25).unwrap()
        + Duration::milliseconds(796);

    assert_eq!(snowflake_time(175_928_847_299_117_063), expected);
}

#[test]
fn test_later_time_yields_larger_snowflake() {
    let earlier = DateTime::from_timestamp_millis(1_600_000_000_000).unwrap();
    let later = earlier + Duration::milliseconds(1);

    assert!(snowflake_at(later) > snowflake_at(earlier));
}

#[test]
fn test_times_before_discord_epoch_clamp_to_first_snowflake() {
    let before_epoch = DateTime::from_timestamp_millis(DISCORD_EPOCH_MS - 60_000).unwrap();
    let epoch = DateTime::from_timestamp_millis(DISCORD_EPOCH_MS).unwrap();

    assert_eq!(snowflake_at(before_epoch), 1);
    assert_eq!(snowflake_at(epoch), 1);
    assert_eq!(snowflake_time(1), epoch);
}
