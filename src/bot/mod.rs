// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Discord bot on poise/serenity.
//!
//! ```text
//! run(config)
//!   |
//!   +--> temp dir reset
//!   +--> Http --> Notifier, ForumBackend | LocalBackend --> DocumentStore (+ sweeper)
//!   +--> DeepL client and language map (optional)
//!   +--> Framework (commands, events, on_error) --> Client --> gateway
//!   |
//!   Ctrl-C --> notify --> flush store --> grace period --> stop shards --> remove temp dir
//! ```

pub mod attachments;
pub mod commands;
pub mod data_request;
pub mod embeds;
pub mod events;
pub mod forum;
pub mod info;
pub mod notify;

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::config::types::{DeeplConfig, StoreBackendKind};
use crate::error::{FsError, Result};
use crate::logging::LogReason;
use crate::pack::PackResources;
use crate::package::PackageModes;
use crate::store::{DocumentBackend, DocumentStore, LocalBackend};
use crate::translate::{DeeplClient, LanguageMap};

use embeds::error_embed;
use forum::ForumBackend;
use info::{BotInfo, bedrock_samples_version};
use notify::{LogSource, Notifier};

pub type Error = anyhow::Error;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// State shared by every command and event.
pub struct Data {
    pub config: Config,
    pub store: Arc<DocumentStore>,
    pub package_modes: PackageModes,
    pub resources: PackResources,
    pub deepl: Option<DeeplClient>,
    /// Target languages of [`Data::deepl`], fetched at startup.
    pub languages: Option<LanguageMap>,
    pub notifier: Notifier,
    pub start_time: DateTime<Utc>,
    pub samples_version: String,
}

/// Where a command ran, for [`Notifier::log`].
#[must_use]
pub fn command_source(ctx: Context<'_>, files: Vec<String>) -> LogSource {
    LogSource {
        guild: ctx.guild().map(|guild| guild.name.clone()),
        user: ctx.author().tag(),
        files,
    }
}

const SHUTDOWN_MESSAGE: &str = "Erutcurts is now shutting down...";
const NON_FREE_KEY_MESSAGE: &str = "DeepL API key is not a free key. Translation may incur costs.";

/// Connect to Discord and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the temp dir or resources cannot be prepared, or the
/// client fails to connect.
pub async fn run(config: Config) -> Result<()> {
    let temp_dir = config.paths.temp_dir();
    reset_dir(&temp_dir)?;

    let token = config.discord.token.clone();
    let http = Arc::new(serenity::Http::new(&token));
    let notifier = Notifier::new(Arc::clone(&http), config.discord.notification_channel_id);

    let backend: Arc<dyn DocumentBackend> =
        match (config.store.backend, config.discord.database_channel_id) {
            (StoreBackendKind::Discord, Some(channel)) => {
                Arc::new(ForumBackend::new(Arc::clone(&http), channel))
            }
            _ => Arc::new(LocalBackend::new(&config.store.dir)),
        };
    tracing::info!(reason = %LogReason::Store, backend = %config.store.backend, "Opened document store");
    let store = Arc::new(DocumentStore::new(backend, config.store.expire_after_access()));
    let cancel = CancellationToken::new();
    let sweeper = store.spawn_sweeper(config.store.expire_after_access(), cancel.clone());

    let (deepl, languages) = init_deepl(&config.deepl, &notifier).await;
    let resources = PackResources::load(config.paths.resources.as_deref())?;
    let samples_version = bedrock_samples_version(config.paths.resources.as_deref());

    let owners: HashSet<serenity::UserId> = config
        .discord
        .admin_user_id
        .map(serenity::UserId::new)
        .into_iter()
        .collect();
    let admin_guild = config.discord.admin_guild_id.map(serenity::GuildId::new);
    let grace = config.discord.shutdown_grace();

    let data = Data {
        package_modes: PackageModes::new(config.store.expire_after_access()),
        config,
        store: Arc::clone(&store),
        resources,
        deepl,
        languages,
        notifier: notifier.clone(),
        start_time: Utc::now(),
        samples_version,
    };

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            owners,
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::handle(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            pre_command: |ctx| {
                Box::pin(async move {
                    let message = format!("Executed interaction: {}", ctx.command().qualified_name);
                    ctx.data()
                        .notifier
                        .log(&message, &command_source(ctx, Vec::new()))
                        .await;
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                register_commands(ctx, &framework.options().commands, admin_guild).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILDS;
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .activity(serenity::ActivityData::playing(BotInfo::ACTIVITY))
        .await?;

    let shard_manager = Arc::clone(&client.shard_manager);
    let shutdown_store = Arc::clone(&store);
    let shutdown_cancel = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(reason = %LogReason::Discord, error = %e, "Failed to listen for Ctrl-C");
            return;
        }
        notifier.notify(SHUTDOWN_MESSAGE).await;
        shutdown_cancel.cancel();
        if let Err(e) = shutdown_store.flush().await {
            tracing::error!(reason = %LogReason::Store, error = %e, "Failed to flush store");
        }
        tokio::time::sleep(grace).await;
        shard_manager.shutdown_all().await;
    });

    let result = client.start().await;
    cancel.cancel();
    if let Err(e) = sweeper.await {
        tracing::warn!(reason = %LogReason::Store, error = %e, "Sweeper task failed");
    }
    if let Err(e) = std::fs::remove_dir_all(&temp_dir) {
        tracing::debug!(reason = %LogReason::Filesystem, path = %temp_dir.display(), error = %e, "Temp dir not removed");
    }
    result?;
    Ok(())
}

/// Empty `dir`, creating it when missing.
fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir).map_err(|e| FsError::io(dir, e))?;
    }
    std::fs::create_dir_all(dir).map_err(|e| FsError::io(dir, e))?;
    tracing::debug!(reason = %LogReason::Filesystem, path = %dir.display(), "Reset temp dir");
    Ok(())
}

async fn init_deepl(config: &DeeplConfig, notifier: &Notifier) -> (Option<DeeplClient>, Option<LanguageMap>) {
    if !config.is_active() {
        tracing::info!(reason = %LogReason::Translate, "DeepL disabled");
        return (None, None);
    }
    let mut client = DeeplClient::new(config.auth_key.as_str());
    if let Some(url) = &config.api_url {
        client = client.with_api_url(url.as_str());
    }
    if !client.is_free() {
        notifier.notify(NON_FREE_KEY_MESSAGE).await;
    }
    match client.target_languages().await {
        Ok(languages) => {
            tracing::info!(reason = %LogReason::Translate, languages = languages.len(), "DeepL ready");
            let map = LanguageMap::new(&languages);
            (Some(client), Some(map))
        }
        Err(e) => {
            tracing::warn!(reason = %LogReason::Translate, error = %e, "DeepL unavailable, translation disabled");
            (None, None)
        }
    }
}

/// Global commands everywhere, owner-only ones in the admin guild.
async fn register_commands(
    ctx: &serenity::Context,
    commands: &[poise::Command<Data, Error>],
    admin_guild: Option<serenity::GuildId>,
) -> Result<()> {
    let (admin, global): (Vec<_>, Vec<_>) = commands.iter().partition(|command| command.owners_only);
    let global: Vec<_> = global
        .into_iter()
        .filter_map(poise::Command::create_as_slash_command)
        .collect();
    let admin: Vec<_> = admin
        .into_iter()
        .filter_map(poise::Command::create_as_slash_command)
        .collect();

    serenity::Command::set_global_commands(ctx, global).await?;
    if let Some(guild) = admin_guild {
        guild.set_commands(ctx, admin).await?;
    }
    tracing::info!(reason = %LogReason::Discord, "Registered commands");
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            let reply = poise::CreateReply::default()
                .embed(error_embed(&error))
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                tracing::warn!(reason = %LogReason::Discord, error = %e, "Failed to send error reply");
            }
            ctx.data().notifier.error(&error).await;
        }
        poise::FrameworkError::EventHandler { error, framework, .. } => {
            framework.user_data.notifier.error(&error).await;
        }
        poise::FrameworkError::Setup { error, .. } => {
            tracing::error!(reason = %LogReason::Discord, "Setup failed: {error:#}");
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::warn!(reason = %LogReason::Discord, error = %e, "Failed to handle framework error");
            }
        }
    }
}
