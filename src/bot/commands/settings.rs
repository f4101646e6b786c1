// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! `/settings list`, `/settings set autogenerate value`

use crate::bot::embeds::default_embed;
use crate::bot::{Context, Error, command_source};
use crate::settings::{GuildSettings, guild_settings, set_auto_generation};

const SETTINGS_TITLE: &str = "設定";

fn settings_reply(settings: &GuildSettings) -> poise::CreateReply {
    let embed = settings
        .display_fields()
        .into_iter()
        .fold(default_embed(SETTINGS_TITLE), |embed, (name, value)| {
            embed.field(name, value, false)
        });
    poise::CreateReply::default().embed(embed)
}

fn guild_key(ctx: Context<'_>) -> Result<String, Error> {
    ctx.guild_id()
        .map(|id| id.to_string())
        .ok_or_else(|| anyhow::anyhow!("このコマンドはサーバー内でのみ使用できます"))
}

/// サーバーの設定を確認・変更します
#[poise::command(slash_command, guild_only, subcommands("list", "set"), subcommand_required)]
pub async fn settings(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// 現在の設定を表示します
#[poise::command(slash_command, guild_only)]
async fn list(ctx: Context<'_>) -> Result<(), Error> {
    let settings = guild_settings(&ctx.data().store, &guild_key(ctx)?).await?;
    ctx.send(settings_reply(&settings)).await?;
    Ok(())
}

/// 設定を変更します
#[poise::command(slash_command, guild_only, subcommands("autogenerate"), subcommand_required)]
async fn set(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// ストラクチャーファイルの自動変換を切り替えます
#[poise::command(slash_command, guild_only)]
async fn autogenerate(
    ctx: Context<'_>,
    #[description = "有効にするかどうか"] value: bool,
) -> Result<(), Error> {
    let settings = set_auto_generation(&ctx.data().store, &guild_key(ctx)?, value).await?;
    ctx.send(settings_reply(&settings)).await?;
    ctx.data()
        .notifier
        .log(
            &format!("Set pack auto generation to {value}."),
            &command_source(ctx, Vec::new()),
        )
        .await;
    Ok(())
}
