// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! `/convert type file1 [file2..file10]`

use poise::serenity_prelude as serenity;

use super::TargetChoice;
use crate::bot::attachments::convert_attachments;
use crate::bot::{Context, Error, command_source};
use crate::structure::McExtension;

/// ストラクチャーファイルを変換します
#[poise::command(slash_command)]
pub async fn convert(
    ctx: Context<'_>,
    #[rename = "type"]
    #[description = "変換先の形式"]
    target: TargetChoice,
    #[description = "ストラクチャーファイル"] file1: serenity::Attachment,
    file2: Option<serenity::Attachment>,
    file3: Option<serenity::Attachment>,
    file4: Option<serenity::Attachment>,
    file5: Option<serenity::Attachment>,
    file6: Option<serenity::Attachment>,
    file7: Option<serenity::Attachment>,
    file8: Option<serenity::Attachment>,
    file9: Option<serenity::Attachment>,
    file10: Option<serenity::Attachment>,
) -> Result<(), Error> {
    ctx.defer().await?;

    let attachments: Vec<&serenity::Attachment> = [
        Some(&file1),
        file2.as_ref(),
        file3.as_ref(),
        file4.as_ref(),
        file5.as_ref(),
        file6.as_ref(),
        file7.as_ref(),
        file8.as_ref(),
        file9.as_ref(),
        file10.as_ref(),
    ]
    .into_iter()
    .flatten()
    .collect();

    if let Some(invalid) = attachments
        .iter()
        .find(|attachment| !McExtension::McStructure.matches(&attachment.filename))
    {
        anyhow::bail!("'{}' is not a .mcstructure file", invalid.filename);
    }

    let files = convert_attachments(ctx.data(), target.into(), &attachments).await?;
    let names = files.iter().map(|file| file.filename.clone()).collect();

    let reply = files
        .into_iter()
        .fold(poise::CreateReply::default(), poise::CreateReply::attachment);
    ctx.send(reply).await?;

    ctx.data()
        .notifier
        .log("Converted structures.", &command_source(ctx, names))
        .await;
    Ok(())
}
