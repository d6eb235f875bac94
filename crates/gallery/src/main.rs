//! Gallery CLI binary.
//!
//! This binary provides command-line access to Gallery:
//! - Run the Discord bot and its curation loop
//! - Parse and format retention durations
//! - Inspect the settings document

use clap::Parser;
use gallery::cli::{
    Cli, Commands, SettingsCommands, handle_duration_command, settings_path, show_settings,
};
use gallery_core::GalleryConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env so DISCORD_TOKEN and RUST_LOG can live beside the binary
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run { settings } => {
            let mut config = GalleryConfig::load_with(cli.config.as_deref())?;
            if let Some(path) = settings {
                config = config.with_settings_path(path);
            }
            run_bot(config).await?;
        }

        Commands::Duration(cmd) => {
            println!("{}", handle_duration_command(&cmd)?);
        }

        Commands::Settings(SettingsCommands::Show { path, channel }) => {
            let config = GalleryConfig::load_with(cli.config.as_deref())?;
            let path = settings_path(&config, path.as_deref());
            println!("{}", show_settings(&path, channel)?);
        }
    }

    Ok(())
}

#[cfg(feature = "discord")]
async fn run_bot(config: GalleryConfig) -> Result<(), Box<dyn std::error::Error>> {
    use gallery::GalleryBot;

    let token = std::env::var("DISCORD_TOKEN")
        .map_err(|_| "DISCORD_TOKEN environment variable not set")?;

    tracing::info!(
        settings_path = %config.settings_path().display(),
        poll_interval_secs = *config.schedule().poll_interval_secs(),
        "Starting Gallery"
    );
    let bot = GalleryBot::new(token, &config).await?;
    bot.start().await?;
    Ok(())
}

#[cfg(not(feature = "discord"))]
async fn run_bot(_config: GalleryConfig) -> Result<(), Box<dyn std::error::Error>> {
    Err("gallery was built without the `discord` feature".into())
}
