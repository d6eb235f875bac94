//! Discord bot client setup and lifecycle management.

use super::{DiscordPlatform, GalleryHandler};
use gallery_core::GalleryConfig;
use gallery_curator::{CurationHandle, CurationOptions, CurationService};
use gallery_error::{GalleryResult, PlatformError, PlatformErrorKind};
use gallery_storage::{JsonSettingsStore, SettingsHandle};
use serenity::Client;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, instrument};

/// The Gallery Discord bot: gateway client plus curation loop.
///
/// # Example
/// ```no_run
/// use gallery_core::GalleryConfig;
/// use gallery_social::GalleryBot;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let token = std::env::var("DISCORD_TOKEN")?;
///     let config = GalleryConfig::load()?;
///
///     let bot = GalleryBot::new(token, &config).await?;
///     bot.start().await?;
///     Ok(())
/// }
/// ```
pub struct GalleryBot {
    client: Client,
    service: CurationService<DiscordPlatform>,
}

impl GalleryBot {
    /// Create the bot, bootstrapping the settings file if needed.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The settings file cannot be created or read
    /// - The Serenity client fails to initialize
    #[instrument(skip(token, config), fields(token_len = token.len(), settings_path = %config.settings_path().display()))]
    pub async fn new(token: String, config: &GalleryConfig) -> GalleryResult<Self> {
        info!("Initializing Gallery Discord bot");

        let store = JsonSettingsStore::new(config.settings_path());
        store.ensure_exists()?;
        let settings = SettingsHandle::open(Arc::new(store))?;

        let options = CurationOptions::from_config(config);
        let (ready_tx, ready_rx) = watch::channel(false);
        let handler = GalleryHandler::new(
            settings.clone(),
            options.clone(),
            config.command_prefix().clone(),
            ready_tx,
        );

        let intents = GalleryHandler::intents();
        info!("Building Serenity client with intents: {:?}", intents);

        let client = Client::builder(&token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| {
                PlatformError::new(PlatformErrorKind::ConnectionFailed(format!(
                    "Failed to build client: {}",
                    e
                )))
            })?;

        let platform = Arc::new(DiscordPlatform::new(
            client.http.clone(),
            client.cache.clone(),
            ready_rx,
        ));
        let service = CurationService::new(platform, settings, options);

        info!("Serenity client built successfully");
        Ok(Self { client, service })
    }

    /// Run until the gateway closes or Ctrl+C is pressed, then stop curation.
    ///
    /// # Errors
    /// Returns an error if the client fails to start or encounters a fatal error.
    #[instrument(skip(self))]
    pub async fn start(self) -> GalleryResult<()> {
        let Self { mut client, service } = self;
        let curation = CurationHandle::start(service);
        let shards = client.shard_manager.clone();

        info!("Starting Discord bot");
        let result = tokio::select! {
            result = client.start() => result.map_err(|e| {
                PlatformError::new(PlatformErrorKind::ConnectionFailed(format!(
                    "Client error: {}",
                    e
                )))
            }),
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested");
                shards.shutdown_all().await;
                Ok(())
            }
        };

        curation.stop().await?;
        info!("Discord bot stopped");
        Ok(result?)
    }
}
