// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Messages to the notification channel.
//!
//! ```text
//! notify()        "Notification"  theme colour
//! log()           "Log"           green, Guild / User / Files fields
//! error()         "Error"         red
//! data_request()  "Data Request"  orange
//! ```
//!
//! Without `discord.notification_channel_id` everything goes to the log only.

use std::sync::Arc;

use poise::serenity_prelude as serenity;

use super::data_request::DataRequest;
use super::embeds::{LOG_COLOUR, default_embed, error_embed};
use crate::logging::LogReason;

/// Where a logged action happened.
#[derive(Debug, Clone, Default)]
pub struct LogSource {
    /// Guild name, `None` for direct messages.
    pub guild: Option<String>,
    pub user: String,
    pub files: Vec<String>,
}

#[derive(Clone)]
pub struct Notifier {
    http: Arc<serenity::Http>,
    channel: Option<serenity::ChannelId>,
}

impl Notifier {
    #[must_use]
    pub fn new(http: Arc<serenity::Http>, channel_id: Option<u64>) -> Self {
        Self {
            http,
            channel: channel_id.map(serenity::ChannelId::new),
        }
    }

    /// Plain notification.
    pub async fn notify(&self, message: &str) {
        tracing::info!(reason = %LogReason::Discord, "{message}");
        self.send(default_embed("Notification").description(message))
            .await;
    }

    /// Record an action taken for a user.
    pub async fn log(&self, message: &str, source: &LogSource) {
        tracing::info!(
            reason = %LogReason::Discord,
            guild = source.guild.as_deref().unwrap_or("DM"),
            user = %source.user,
            "{message}"
        );
        let mut embed = default_embed("Log")
            .colour(LOG_COLOUR)
            .description(message)
            .field("Guild", source.guild.as_deref().unwrap_or("DM"), false)
            .field("User", &source.user, false);
        if !source.files.is_empty() {
            embed = embed.field("Files", source.files.join("\n"), false);
        }
        self.send(embed).await;
    }

    pub async fn error(&self, error: &anyhow::Error) {
        tracing::error!(reason = %LogReason::Discord, "{error:#}");
        self.send(error_embed(error)).await;
    }

    pub async fn data_request(&self, request: DataRequest) {
        tracing::warn!(reason = %LogReason::Discord, request = ?request, "Requesting data");
        self.send(request.embed()).await;
    }

    async fn send(&self, embed: serenity::CreateEmbed) {
        let Some(channel) = self.channel else {
            return;
        };
        let message = serenity::CreateMessage::new().embed(embed);
        if let Err(e) = channel.send_message(&self.http, message).await {
            tracing::warn!(
                reason = %LogReason::Discord,
                channel = %channel,
                error = %e,
                "Failed to send notification"
            );
        }
    }
}
