// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Owner-only commands, registered in the admin guild.

use crate::bot::embeds::default_embed;
use crate::bot::{Context, Error};

/// Document store maintenance
#[poise::command(slash_command, owners_only, subcommands("flush"), subcommand_required)]
pub async fn store(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Write every modified document to the backend now
#[poise::command(slash_command, owners_only, ephemeral)]
async fn flush(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;
    ctx.data().store.flush().await?;
    ctx.send(poise::CreateReply::default().embed(default_embed("Store").description("Flushed.")))
        .await?;
    Ok(())
}
