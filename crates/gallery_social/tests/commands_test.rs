//! Tests for the settings command family.

use gallery_core::ChannelId;
use gallery_error::CommandErrorKind;
use gallery_social::{
    CommandContext, CommandContextBuilder, SettingsCommand, SettingsCommands, parse_bool,
};
use gallery_storage::{MemorySettingsStore, SettingsHandle};
use std::sync::Arc;
use std::time::Duration;

const CHANNEL: ChannelId = ChannelId(42);

fn setup() -> (SettingsCommands, SettingsHandle, Arc<MemorySettingsStore>) {
    let store = Arc::new(MemorySettingsStore::new());
    let handle = SettingsHandle::open(store.clone()).expect("Open settings");
    let commands = SettingsCommands::new(handle.clone(), Duration::from_secs(300));
    (commands, handle, store)
}

fn ctx(can_manage: bool) -> CommandContext {
    CommandContextBuilder::default()
        .channel(CHANNEL)
        .mention("<#42>")
        .bot_can_manage_messages(can_manage)
        .build()
        .expect("Valid context")
}

fn run(commands: &SettingsCommands, args: &str) -> String {
    let command = SettingsCommand::parse(args).expect("Valid command");
    commands.execute(&ctx(true), command).expect("Command runs")
}

#[test]
fn test_parse_subcommands() {
    assert_eq!(SettingsCommand::parse("").unwrap(), SettingsCommand::Show);
    assert_eq!(SettingsCommand::parse("turn").unwrap(), SettingsCommand::Turn(None));
    assert_eq!(
        SettingsCommand::parse("PrivOnly yes").unwrap(),
        SettingsCommand::PrivOnly(Some(true))
    );
    assert_eq!(
        SettingsCommand::parse("emotes ⭐ 🖼️").unwrap(),
        SettingsCommand::Emotes(vec!["⭐".to_string(), "🖼️".to_string()])
    );
    assert_eq!(
        SettingsCommand::parse("role Digital Painters").unwrap(),
        SettingsCommand::Role(Some("Digital Painters".to_string()))
    );
}

#[test]
fn test_parse_rejects_unknown_subcommand_and_bad_bool() {
    let err = SettingsCommand::parse("frobnicate").unwrap_err();
    assert!(matches!(err.kind, CommandErrorKind::UnknownSubcommand(ref s) if s == "frobnicate"));

    let err = SettingsCommand::parse("turn maybe").unwrap_err();
    assert!(matches!(err.kind, CommandErrorKind::InvalidArgument { .. }));
}

#[test]
fn test_parse_bool_spellings() {
    for yes in ["on", "YES", "true", "enable", "1"] {
        assert_eq!(parse_bool(yes), Some(true), "{}", yes);
    }
    for no in ["off", "No", "false", "disable", "0"] {
        assert_eq!(parse_bool(no), Some(false), "{}", no);
    }
    assert_eq!(parse_bool("sometimes"), None);
}

#[test]
fn test_show_unconfigured_channel() {
    let (commands, _, _) = setup();
    assert_eq!(run(&commands, ""), "Settings for <#42>: not configured.");
}

#[test]
fn test_show_configured_channel() {
    let (commands, _, _) = setup();
    run(&commands, "turn on");

    let reply = run(&commands, "");
    assert!(reply.starts_with("Settings for <#42>:\n```"));
    assert!(reply.contains("Enabled          : yes"));
    assert!(reply.contains("Artist role name : artist"));
    assert!(reply.contains("Max message age  : 2 days"));
    assert!(reply.contains("Pin emojis       : 🎨, 📌"));
    assert!(reply.contains("Pins only        : no"));
}

#[test]
fn test_turn_on_and_off() {
    let (commands, handle, store) = setup();

    assert_eq!(run(&commands, "turn"), "Gallery curation is disabled in this channel.");
    assert_eq!(run(&commands, "turn off"), "Already disabled.");
    assert_eq!(store.save_count(), 0);

    assert_eq!(run(&commands, "turn on"), "Gallery curation enabled.");
    assert!(handle.snapshot().enabled_in(CHANNEL));
    assert_eq!(run(&commands, "turn on"), "Already enabled.");
    assert_eq!(run(&commands, "turn off"), "Gallery curation disabled.");
    assert_eq!(store.save_count(), 2);
}

#[test]
fn test_turn_on_requires_manage_messages() {
    let (commands, handle, _) = setup();
    let reply = commands
        .execute(&ctx(false), SettingsCommand::Turn(Some(true)))
        .unwrap();

    assert!(reply.contains("Manage messages"));
    assert!(!handle.is_configured(CHANNEL));
}

#[test]
fn test_emotes_validation_and_update() {
    let (commands, handle, _) = setup();

    assert_eq!(run(&commands, "emotes"), "Pin emotes for this channel: 🎨 📌");
    assert_eq!(
        run(&commands, "emotes ⭐ <:custom:1234>"),
        "Error: You can only use unicode emotes."
    );
    assert_eq!(run(&commands, "emotes ab"), "Error: You can only use unicode emotes.");

    assert_eq!(run(&commands, "emotes ⭐ 👍🏽 ⭐"), "Updated pin emotes for this channel.");
    assert_eq!(
        handle.config_for(CHANNEL).pin_emojis(),
        &vec!["⭐".to_string(), "👍🏽".to_string()]
    );
}

#[test]
fn test_privonly_replies() {
    let (commands, _, _) = setup();

    assert_eq!(run(&commands, "privonly"), "Currently, content posted by anyone will be kept.");
    assert_eq!(run(&commands, "privonly off"), "No change: content posted by anyone will be kept.");
    assert_eq!(
        run(&commands, "privonly on"),
        "Updated: content posted by privileged users will be kept."
    );
}

#[test]
fn test_pinsonly_replies() {
    let (commands, handle, _) = setup();

    assert_eq!(run(&commands, "pinsonly"), "Currently, all messages with content will be kept.");
    assert_eq!(run(&commands, "pinsonly on"), "Updated: only pinned messages will be kept.");
    assert!(*handle.config_for(CHANNEL).pinned_only());
    assert_eq!(run(&commands, "pinsonly on"), "No change: only pinned messages will be kept.");
}

#[test]
fn test_age_show_and_set() {
    let (commands, handle, _) = setup();

    assert_eq!(run(&commands, "age"), "Current maximum age is 2 days.");
    assert_eq!(run(&commands, "age 1 day and 2 hours"), "Maximum post age set to 1 day and 2 hours.");
    assert_eq!(*handle.config_for(CHANNEL).expiration_secs(), 93_600);
}

#[test]
fn test_age_rejects_bad_input_inline() {
    let (commands, handle, store) = setup();

    let reply = run(&commands, "age 3 fortnights");
    assert!(reply.contains("Invalid unit"));

    let reply = run(&commands, "age 1.2.3h");
    assert!(reply.contains("Not a number"));

    let reply = run(&commands, "age 14d");
    assert!(reply.contains("within two weeks"));

    assert!(!handle.is_configured(CHANNEL));
    assert_eq!(store.save_count(), 0);
}

#[test]
fn test_age_below_poll_interval_warns() {
    let (commands, handle, _) = setup();

    let reply = run(&commands, "age 2m");
    assert!(reply.starts_with("Maximum post age set to 2 minutes."));
    assert!(reply.contains("only checked every 5 minutes"));
    assert_eq!(*handle.config_for(CHANNEL).expiration_secs(), 120);
}

#[test]
fn test_role_show_and_set() {
    let (commands, handle, _) = setup();

    assert_eq!(run(&commands, "role"), "Artist role name is currently artist.");
    assert_eq!(run(&commands, "role Illustrators"), "Artist role set.");
    assert_eq!(handle.config_for(CHANNEL).artist_role(), "Illustrators");
}
