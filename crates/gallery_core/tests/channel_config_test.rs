//! Tests for channel configuration and the settings map.

use gallery_core::{
    ChannelConfig, ChannelId, DEFAULT_ARTIST_ROLE, DEFAULT_EXPIRATION_SECS, DEFAULT_PIN_EMOJIS,
    GallerySettings,
};

#[test]
fn test_channel_config_defaults() {
    let config = ChannelConfig::default();
    assert!(!*config.enabled());
    assert_eq!(config.artist_role(), DEFAULT_ARTIST_ROLE);
    assert_eq!(*config.expiration_secs(), DEFAULT_EXPIRATION_SECS);
    assert_eq!(config.pin_emojis(), &vec!["🎨".to_string(), "📌".to_string()]);
    assert_eq!(config.pin_emojis().len(), DEFAULT_PIN_EMOJIS.len());
    assert!(!*config.privileged_only());
    assert!(!*config.pinned_only());
}

#[test]
fn test_channel_config_builder() {
    let config = ChannelConfig::builder()
        .enabled(true)
        .artist_role("painter")
        .expiration_secs(3_600_u64)
        .pinned_only(true)
        .build()
        .expect("Valid config");

    assert!(*config.enabled());
    assert_eq!(config.artist_role(), "painter");
    assert_eq!(*config.expiration_secs(), 3_600);
    assert!(*config.pinned_only());
    assert!(!*config.privileged_only());
    assert_eq!(config.pin_emojis().len(), 2);
}

#[test]
fn test_channel_config_reads_document_keys() {
    let json = r#"{
        "ENABLED": true,
        "ARTIST_ROLE": "Illustrator",
        "EXPIRATION": 600,
        "PIN_EMOTES": ["⭐"],
        "PRIV_ONLY": true,
        "PINS_ONLY": false
    }"#;
    let config: ChannelConfig = serde_json::from_str(json).expect("Valid record");

    assert!(*config.enabled());
    assert_eq!(config.artist_role(), "Illustrator");
    assert_eq!(*config.expiration_secs(), 600);
    assert_eq!(config.pin_emojis(), &vec!["⭐".to_string()]);
    assert!(*config.privileged_only());
}

#[test]
fn test_channel_config_partial_record_uses_defaults() {
    let config: ChannelConfig = serde_json::from_str(r#"{"PRIV_ONLY": true}"#).unwrap();
    assert!(!*config.enabled());
    assert!(*config.privileged_only());
    assert_eq!(*config.expiration_secs(), DEFAULT_EXPIRATION_SECS);

    let empty: ChannelConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, ChannelConfig::default());
}

#[test]
fn test_channel_config_writes_document_keys() {
    let value = serde_json::to_value(ChannelConfig::default()).unwrap();
    let object = value.as_object().unwrap();
    for key in ["ENABLED", "ARTIST_ROLE", "EXPIRATION", "PIN_EMOTES", "PRIV_ONLY", "PINS_ONLY"] {
        assert!(object.contains_key(key), "missing {}", key);
    }
}

#[test]
fn test_set_pin_emojis_deduplicates_in_order() {
    let mut config = ChannelConfig::default();
    config.set_pin_emojis(["⭐", "📌", "⭐", "🎨", "📌"]);
    assert_eq!(
        config.pin_emojis(),
        &vec!["⭐".to_string(), "📌".to_string(), "🎨".to_string()]
    );
}

#[test]
fn test_config_for_unknown_channel_is_default() {
    let settings = GallerySettings::new();
    assert_eq!(settings.config_for(ChannelId(1)), ChannelConfig::default());
    assert!(!settings.is_configured(ChannelId(1)));
    assert!(!settings.enabled_in(ChannelId(1)));
}

#[test]
fn test_entry_creates_default_record() {
    let mut settings = GallerySettings::new();
    settings.entry(ChannelId(5)).set_enabled(true);

    assert!(settings.is_configured(ChannelId(5)));
    assert!(settings.enabled_in(ChannelId(5)));
    assert_eq!(settings.config_for(ChannelId(5)).artist_role(), DEFAULT_ARTIST_ROLE);
}

#[test]
fn test_enabled_channels_filters_and_orders() {
    let mut settings = GallerySettings::new();
    settings.entry(ChannelId(30)).set_enabled(true);
    settings.entry(ChannelId(10)).set_enabled(true);
    settings.entry(ChannelId(20)).set_enabled(false);

    let enabled: Vec<ChannelId> = settings.enabled_channels().map(|(id, _)| id).collect();
    assert_eq!(enabled, vec![ChannelId(10), ChannelId(30)]);
    assert_eq!(settings.len(), 3);
}

#[test]
fn test_settings_document_keys_are_channel_ids() {
    let json = r#"{"123": {"ENABLED": true}, "456": {}}"#;
    let settings: GallerySettings = serde_json::from_str(json).expect("Valid document");

    assert!(settings.enabled_in(ChannelId(123)));
    assert!(settings.is_configured(ChannelId(456)));
    assert!(!settings.enabled_in(ChannelId(456)));

    let written = serde_json::to_value(&settings).unwrap();
    assert!(written.get("123").is_some());
}

#[test]
fn test_remove_drops_record() {
    let mut settings = GallerySettings::new();
    settings.insert(ChannelId(1), ChannelConfig::default());
    assert!(settings.remove(ChannelId(1)).is_some());
    assert!(settings.remove(ChannelId(1)).is_none());
    assert!(settings.is_empty());
}
