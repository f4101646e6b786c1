// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! `/help [info]`

use poise::serenity_prelude as serenity;

use crate::bot::embeds::default_embed;
use crate::bot::info::{BotInfo, RuntimeInfo, help_description, help_timestamp, info_fields};
use crate::bot::{Context, Error};

/// ヘルプを表示します
#[poise::command(slash_command, ephemeral)]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Botの情報を表示します"] info: Option<bool>,
) -> Result<(), Error> {
    let data = ctx.data();
    let contact = match data.config.discord.admin_user_id {
        Some(id) => serenity::UserId::new(id)
            .to_user(ctx.serenity_context())
            .await
            .ok()
            .map(|user| user.tag()),
        None => None,
    };

    let mut embed = default_embed("ヘルプ").description(help_description(contact.as_deref()));
    if let Some(timestamp) = help_timestamp().and_then(|ts| serenity::Timestamp::from_unix_timestamp(ts).ok()) {
        embed = embed.timestamp(timestamp);
    }

    if info.unwrap_or(false) {
        let runtime = RuntimeInfo {
            supported_languages: data
                .languages
                .as_ref()
                .map(|languages| {
                    languages
                        .supported_locales()
                        .into_iter()
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            samples_version: data.samples_version.clone(),
            start_time: data.start_time,
            ping_ms: i64::try_from(ctx.ping().await.as_millis()).unwrap_or(i64::MAX),
        };
        embed = info_fields(&runtime)
            .into_iter()
            .fold(embed, |embed, (name, value)| embed.field(name, value, true));
    }

    let link = serenity::CreateButton::new_link(BotInfo::GITHUB_URL).label("GitHub");
    ctx.send(
        poise::CreateReply::default()
            .embed(embed)
            .components(vec![serenity::CreateActionRow::Buttons(vec![link])]),
    )
    .await?;
    Ok(())
}
