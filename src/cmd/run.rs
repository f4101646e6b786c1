// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! `run`: start the Discord bot.

use crate::bot;
use crate::config::Config;
use crate::error::Result;
use crate::logging::LogReason;

/// Start the bot and block until it shuts down.
///
/// # Errors
///
/// Returns an error if the token is missing or the bot stops with an error.
pub async fn run_bot_command(config: Config) -> Result<()> {
    config.validate_for_run()?;
    tracing::info!(
        reason = %LogReason::Discord,
        version = env!("CARGO_PKG_VERSION"),
        "Starting bot"
    );
    bot::run(config).await
}
