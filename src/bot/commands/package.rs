// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! `/package start|cancel|convert [type]|status`

use poise::serenity_prelude as serenity;

use super::TargetChoice;
use crate::bot::attachments::{convert_attachments, structure_attachments};
use crate::bot::embeds::default_embed;
use crate::bot::{Context, Data, Error, command_source};
use crate::package::{
    ChannelMessage, EMBED_TITLE, MESSAGE_HISTORY_LIMIT, PackageModes, PackageOutcome,
    PackageSubcommand, find_start_message, outcome,
};
use crate::pack::TargetType;

/// A fetched message seen through [`ChannelMessage`].
struct HistoryMessage<'a> {
    message: &'a serenity::Message,
    bot_id: serenity::UserId,
}

impl ChannelMessage for HistoryMessage<'_> {
    fn is_self(&self) -> bool {
        self.message.author.id == self.bot_id
    }

    #[allow(deprecated)]
    fn interaction_name(&self) -> Option<&str> {
        self.message
            .interaction
            .as_ref()
            .map(|interaction| interaction.name.as_str())
    }

    #[allow(deprecated)]
    fn interaction_id(&self) -> Option<u64> {
        self.message
            .interaction
            .as_ref()
            .map(|interaction| interaction.id.get())
    }
}

/// Id of the message that started the package in `channel`, if any.
///
/// The reply to the `running` interaction is skipped.
async fn find_start(
    http: &serenity::Http,
    channel: serenity::ChannelId,
    bot_id: serenity::UserId,
    running: Option<u64>,
) -> serenity::Result<Option<serenity::MessageId>> {
    let messages = channel
        .messages(http, serenity::GetMessages::new().limit(MESSAGE_HISTORY_LIMIT))
        .await?;
    let history: Vec<HistoryMessage<'_>> = messages
        .iter()
        .map(|message| HistoryMessage { message, bot_id })
        .collect();
    Ok(find_start_message(&history, running).map(|start| start.message.id))
}

/// Package mode of `channel`, scanning the history on a cache miss.
///
/// `running` is the interaction being handled, if any.
///
/// # Errors
///
/// Returns an error if the history cannot be fetched.
pub async fn is_package_mode(
    http: &serenity::Http,
    modes: &PackageModes,
    channel: serenity::ChannelId,
    bot_id: serenity::UserId,
    running: Option<u64>,
) -> serenity::Result<bool> {
    if let Some(enabled) = modes.cached(channel.get()) {
        return Ok(enabled);
    }
    let enabled = find_start(http, channel, bot_id, running).await?.is_some();
    modes.set(channel.get(), enabled);
    Ok(enabled)
}

/// `/package` with each subcommand described from [`PackageSubcommand`].
#[must_use]
pub fn command() -> poise::Command<Data, Error> {
    let mut command = package();
    for subcommand in &mut command.subcommands {
        if let Some(sub) = PackageSubcommand::from_name(&subcommand.name) {
            subcommand.description = Some(sub.description().to_string());
        }
    }
    command
}

/// ストラクチャーファイルをまとめて変換します
#[poise::command(
    slash_command,
    subcommands("start", "cancel", "convert", "status"),
    subcommand_required
)]
pub async fn package(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

#[poise::command(slash_command)]
async fn start(ctx: Context<'_>) -> Result<(), Error> {
    run(ctx, PackageSubcommand::Start, TargetType::Behavior).await
}

#[poise::command(slash_command)]
async fn cancel(ctx: Context<'_>) -> Result<(), Error> {
    run(ctx, PackageSubcommand::Cancel, TargetType::Behavior).await
}

#[poise::command(slash_command)]
async fn convert(
    ctx: Context<'_>,
    #[rename = "type"]
    #[description = "変換先の形式"]
    target: Option<TargetChoice>,
) -> Result<(), Error> {
    let target = target.map_or(TargetType::Behavior, TargetType::from);
    run(ctx, PackageSubcommand::Convert, target).await
}

#[poise::command(slash_command)]
async fn status(ctx: Context<'_>) -> Result<(), Error> {
    run(ctx, PackageSubcommand::Status, TargetType::Behavior).await
}

async fn run(ctx: Context<'_>, sub: PackageSubcommand, target: TargetType) -> Result<(), Error> {
    ctx.defer().await?;
    let http = ctx.http();
    let channel = ctx.channel_id();
    let bot_id = ctx.framework().bot_id;
    let modes = &ctx.data().package_modes;
    // the deferred reply is already in the history
    let running = Some(ctx.id());

    let enabled = is_package_mode(http, modes, channel, bot_id, running).await?;
    match outcome(sub, enabled) {
        PackageOutcome::Reply(text) => {
            ctx.send(poise::CreateReply::default().embed(default_embed(EMBED_TITLE).description(text)))
                .await?;
        }
        PackageOutcome::Convert => {
            let Some(start_id) = find_start(http, channel, bot_id, running).await? else {
                modes.set(channel.get(), false);
                anyhow::bail!("パッケージの開始メッセージが見つかりません");
            };
            convert_collected(ctx, start_id, bot_id, target).await?;
        }
    }
    modes.apply(channel.get(), sub, enabled);
    Ok(())
}

async fn convert_collected(
    ctx: Context<'_>,
    start_id: serenity::MessageId,
    bot_id: serenity::UserId,
    target: TargetType,
) -> Result<(), Error> {
    let messages = ctx
        .channel_id()
        .messages(
            ctx.http(),
            serenity::GetMessages::new()
                .after(start_id)
                .limit(MESSAGE_HISTORY_LIMIT),
        )
        .await?;

    // fetched newest first; convert in posting order
    let attachments: Vec<&serenity::Attachment> = messages
        .iter()
        .rev()
        .filter(|message| message.author.id != bot_id)
        .flat_map(|message| structure_attachments(&message.attachments))
        .collect();
    if attachments.is_empty() {
        anyhow::bail!("パッケージにストラクチャーファイルが含まれていません");
    }

    let files = convert_attachments(ctx.data(), target, &attachments).await?;
    let names = files.iter().map(|file| file.filename.clone()).collect();
    let reply = files.into_iter().fold(
        poise::CreateReply::default()
            .embed(default_embed(EMBED_TITLE).description("変換しました")),
        poise::CreateReply::attachment,
    );
    ctx.send(reply).await?;

    ctx.data()
        .notifier
        .log("Converted package.", &command_source(ctx, names))
        .await;
    Ok(())
}
