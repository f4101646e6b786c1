// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Embed builders shared by commands and notifications.

use poise::serenity_prelude as serenity;

use super::info::BotInfo;

/// Discord's limit for embed descriptions.
pub const DESCRIPTION_LIMIT: usize = 4096;

pub const THEME_COLOUR: serenity::Colour = serenity::Colour::from_rgb(191, 148, 228);
pub const ERROR_COLOUR: serenity::Colour = serenity::Colour::from_rgb(255, 0, 0);
pub const LOG_COLOUR: serenity::Colour = serenity::Colour::from_rgb(0, 255, 0);
pub const REQUEST_COLOUR: serenity::Colour = serenity::Colour::from_rgb(255, 200, 0);

/// Themed embed with the bot name in the footer.
#[must_use]
pub fn default_embed(title: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .colour(THEME_COLOUR)
        .footer(serenity::CreateEmbedFooter::new(BotInfo::NAME))
}

/// Red embed carrying the error and its causes.
#[must_use]
pub fn error_embed(error: &anyhow::Error) -> serenity::CreateEmbed {
    default_embed("Error")
        .colour(ERROR_COLOUR)
        .description(truncate_chars(&format!("{error:?}"), DESCRIPTION_LIMIT))
}

/// First `limit` chars of `text`.
#[must_use]
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
