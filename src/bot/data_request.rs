// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Requests for data only an admin can provide.
//!
//! The request is an embed in the notification channel. Replying to it with
//! the requested file feeds the file back to the bot.

use poise::serenity_prelude as serenity;

use super::embeds::{REQUEST_COLOUR, default_embed};
use crate::archive;
use crate::error::Result;
use crate::pack::{LEVEL_VERSIONS_DOCUMENT, LevelVersions};
use crate::store::DocumentStore;

pub const DATA_REQUEST_TITLE: &str = "Data Request";

const LEVEL_DAT: &str = "level.dat";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataRequest {
    /// A freshly exported flat world, read for [`LevelVersions`].
    ExportedFlatWorld,
}

impl DataRequest {
    pub const ALL: [Self; 1] = [Self::ExportedFlatWorld];

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ExportedFlatWorld => {
                "LevelVersions data could not be found.\n\
                 Please create and export a new flat world and reply to this message.\n\
                 Leave the flat world settings as default except for the \"Flat World\" toggle."
            }
        }
    }

    #[must_use]
    pub fn embed(self) -> serenity::CreateEmbed {
        default_embed(DATA_REQUEST_TITLE)
            .colour(REQUEST_COLOUR)
            .description(self.description())
    }

    /// Request shown by an embed with this title and description.
    #[must_use]
    pub fn from_embed(title: Option<&str>, description: Option<&str>) -> Option<Self> {
        if title != Some(DATA_REQUEST_TITLE) {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|request| Some(request.description()) == description)
    }

    /// Consume the reply's attachments.
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly one attachment is given and it holds
    /// the requested data.
    pub async fn process(self, attachments: &[Vec<u8>], store: &DocumentStore) -> Result<()> {
        let [attachment] = attachments else {
            anyhow::bail!("expected exactly one attachment, got {}", attachments.len());
        };
        match self {
            Self::ExportedFlatWorld => {
                let level_dat = archive::extract_entry(attachment, LEVEL_DAT)?;
                let versions = LevelVersions::from_level_dat(&level_dat)?;
                store.put(LEVEL_VERSIONS_DOCUMENT, &versions).await?;
            }
        }
        Ok(())
    }
}
