// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Gateway event handling.
//!
//! ```text
//! Ready        --> notify guilds, prune settings
//! GuildCreate  --> notify join (new guilds only)
//! GuildDelete  --> notify leave, prune settings
//! Message      --> auto-convert | changelog translation | data request reply
//! ```

use std::collections::BTreeSet;

use poise::serenity_prelude as serenity;

use super::attachments::{convert_attachments, structure_attachments};
use super::commands::package::is_package_mode;
use super::data_request::DataRequest;
use super::embeds::error_embed;
use super::info::BotInfo;
use super::notify::LogSource;
use super::{Data, Error};
use crate::logging::LogReason;
use crate::net::Downloader;
use crate::pack::TargetType;
use crate::settings::{is_auto_generation_enabled, retain_guilds};
use crate::translate::changelog::{
    ChangelogKind, MESSAGE_LIMIT, SOURCE_LOCALE, find_version, first_line, split_message, thread_name,
};
use crate::translate::source_language;

/// Entry point registered as the framework's event handler.
///
/// # Errors
///
/// Returns the first failing lifecycle step; message handlers report their
/// own errors.
pub async fn handle(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { .. } => on_ready(ctx, data).await,
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            if *is_new == Some(true) {
                let owner = guild
                    .owner_id
                    .to_user(ctx)
                    .await
                    .map_or_else(|_| guild.owner_id.to_string(), |user| user.tag());
                data.notifier
                    .notify(&format!("Joined Guild: {}, Owner: {owner}", guild.name))
                    .await;
            }
            Ok(())
        }
        serenity::FullEvent::GuildDelete { incomplete, full } => {
            on_guild_delete(ctx, data, incomplete, full.as_ref()).await
        }
        serenity::FullEvent::Message { new_message } => {
            on_message(ctx, framework, data, new_message).await;
            Ok(())
        }
        _ => Ok(()),
    }
}

async fn on_ready(ctx: &serenity::Context, data: &Data) -> Result<(), Error> {
    let guilds = ctx.http.get_guilds(None, None).await?;
    let names: Vec<&str> = guilds.iter().map(|guild| guild.name.as_str()).collect();
    data.notifier
        .notify(&format!(
            "{} is Now Ready!\nJoining Guilds: [{}]",
            BotInfo::NAME,
            names.join(", ")
        ))
        .await;

    let active: BTreeSet<String> = guilds.iter().map(|guild| guild.id.to_string()).collect();
    prune_settings(data, &active).await
}

async fn on_guild_delete(
    ctx: &serenity::Context,
    data: &Data,
    incomplete: &serenity::UnavailableGuild,
    full: Option<&serenity::Guild>,
) -> Result<(), Error> {
    // an outage, not a removal
    if incomplete.unavailable {
        return Ok(());
    }
    let name = full.map_or_else(|| incomplete.id.to_string(), |guild| guild.name.clone());
    data.notifier.notify(&format!("Left Guild: {name}")).await;

    let active: BTreeSet<String> = ctx
        .cache
        .guilds()
        .into_iter()
        .filter(|id| *id != incomplete.id)
        .map(|id| id.to_string())
        .collect();
    prune_settings(data, &active).await
}

async fn prune_settings(data: &Data, active: &BTreeSet<String>) -> Result<(), Error> {
    let removed = retain_guilds(&data.store, active).await?;
    if removed > 0 {
        tracing::info!(reason = %LogReason::Store, removed, "Pruned settings of left guilds");
    }
    Ok(())
}

async fn on_message(
    ctx: &serenity::Context,
    framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
    message: &serenity::Message,
) {
    let results = [
        auto_convert(ctx, framework.bot_id, data, message).await,
        translate_changelog(ctx, data, message).await,
        process_data_request(ctx, framework.bot_id, data, message).await,
    ];
    for error in results.into_iter().filter_map(Result::err) {
        data.notifier.error(&error).await;
    }
}

fn message_source(ctx: &serenity::Context, message: &serenity::Message, files: Vec<String>) -> LogSource {
    LogSource {
        guild: message
            .guild_id
            .and_then(|id| ctx.cache.guild(id).map(|guild| guild.name.clone())),
        user: message.author.tag(),
        files,
    }
}

async fn auto_convert(
    ctx: &serenity::Context,
    bot_id: serenity::UserId,
    data: &Data,
    message: &serenity::Message,
) -> Result<(), Error> {
    if message.author.id == bot_id || !data.config.discord.auto_generation {
        return Ok(());
    }
    let attachments = structure_attachments(&message.attachments);
    if attachments.is_empty() {
        return Ok(());
    }
    if let Some(guild_id) = message.guild_id
        && !is_auto_generation_enabled(&data.store, &guild_id.to_string()).await?
    {
        return Ok(());
    }
    if is_package_mode(&ctx.http, &data.package_modes, message.channel_id, bot_id, None).await? {
        return Ok(());
    }

    let typing = message.channel_id.start_typing(&ctx.http);
    let converted = convert_attachments(data, TargetType::Behavior, &attachments).await;
    typing.stop();

    let reply = serenity::CreateMessage::new()
        .reference_message(message)
        .allowed_mentions(serenity::CreateAllowedMentions::new().replied_user(false));
    match converted {
        Ok(files) => {
            let names = files.iter().map(|file| file.filename.clone()).collect();
            message.channel_id.send_message(&ctx.http, reply.add_files(files)).await?;
            data.notifier
                .log("Auto-generated pack.", &message_source(ctx, message, names))
                .await;
            Ok(())
        }
        Err(error) => {
            message
                .channel_id
                .send_message(&ctx.http, reply.embed(error_embed(&error)))
                .await?;
            Err(error)
        }
    }
}

async fn translate_changelog(
    ctx: &serenity::Context,
    data: &Data,
    message: &serenity::Message,
) -> Result<(), Error> {
    let crossposted = message
        .flags
        .is_some_and(|flags| flags.contains(serenity::MessageFlags::IS_CROSSPOST));
    if !crossposted {
        return Ok(());
    }
    let Some(kind) = ChangelogKind::from_author_name(&message.author.name) else {
        return Ok(());
    };
    let version = find_version(first_line(&message.content))?;

    let mut thread = message.thread.as_ref().map(|thread| thread.id);
    if data.config.discord.changelogs_channel_id == Some(message.channel_id.get()) && thread.is_none() {
        let created = message
            .channel_id
            .create_thread_from_message(
                &ctx.http,
                message.id,
                serenity::CreateThread::new(thread_name(&message.content)),
            )
            .await?;
        thread = Some(created.id);
    }

    let (Some(deepl), Some(languages)) = (&data.deepl, &data.languages) else {
        return Ok(());
    };
    let locale = message
        .guild_id
        .and_then(|id| ctx.cache.guild(id).map(|guild| guild.preferred_locale.clone()))
        .unwrap_or_else(|| BotInfo::DEFAULT_LOCALE.to_string());
    let target = languages.target(&locale)?;
    let source = source_language(SOURCE_LOCALE);
    let translated = deepl
        .translate(&message.content, Some(source.as_str()), target)
        .await?;

    let channel = thread.unwrap_or(message.channel_id);
    for chunk in split_message(&translated, MESSAGE_LIMIT) {
        channel.say(&ctx.http, chunk).await?;
    }
    tracing::info!(
        reason = %LogReason::Translate,
        changelog = kind.channel_name(),
        version = version.unwrap_or("unknown"),
        language = target,
        "Translated changelog"
    );
    Ok(())
}

async fn process_data_request(
    ctx: &serenity::Context,
    bot_id: serenity::UserId,
    data: &Data,
    message: &serenity::Message,
) -> Result<(), Error> {
    let Some(referenced) = message.referenced_message.as_deref() else {
        return Ok(());
    };
    if referenced.author.id != bot_id {
        return Ok(());
    }
    let [embed] = referenced.embeds.as_slice() else {
        return Ok(());
    };
    let Some(request) = DataRequest::from_embed(embed.title.as_deref(), embed.description.as_deref())
    else {
        return Ok(());
    };

    let mut attachments = Vec::with_capacity(message.attachments.len());
    for attachment in &message.attachments {
        attachments.push(
            Downloader::new()
                .url(&attachment.url)
                .silent()
                .download_bytes()
                .await?,
        );
    }
    request.process(&attachments, &data.store).await?;
    data.store.flush().await?;

    data.notifier
        .log(
            &format!("Processed data request: {request:?}."),
            &message_source(ctx, message, Vec::new()),
        )
        .await;
    Ok(())
}
