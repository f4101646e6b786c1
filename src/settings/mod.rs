// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Per-guild settings kept in the `Settings` document.
//!
//! ```text
//! Settings.json  [{"guildId": "...", "packAutoGeneration": false}, ...]
//!                 sorted by guildId, default entries omitted
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::BotResult;
use crate::logging::LogReason;
use crate::store::DocumentStore;

/// Store document holding [`SettingsList`].
pub const SETTINGS_DOCUMENT: &str = "Settings";

pub const DEFAULT_PACK_AUTO_GENERATION: bool = true;

const fn default_pack_auto_generation() -> bool {
    DEFAULT_PACK_AUTO_GENERATION
}

/// Settings of one guild.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildSettings {
    pub guild_id: String,
    #[serde(default = "default_pack_auto_generation")]
    pub pack_auto_generation: bool,
}

impl GuildSettings {
    #[must_use]
    pub fn new(guild_id: impl Into<String>) -> Self {
        Self {
            guild_id: guild_id.into(),
            pack_auto_generation: DEFAULT_PACK_AUTO_GENERATION,
        }
    }

    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.pack_auto_generation == DEFAULT_PACK_AUTO_GENERATION
    }

    /// `(name, value)` rows shown by `/settings list`.
    #[must_use]
    pub const fn display_fields(&self) -> [(&'static str, &'static str); 1] {
        [(
            "ストラクチャーファイル自動変換",
            if self.pack_auto_generation { "有効" } else { "無効" },
        )]
    }
}

/// Contents of the `Settings` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsList(Vec<GuildSettings>);

impl SettingsList {
    /// Drop default entries and sort by guild id.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// In-place [`SettingsList::normalized`].
    pub fn normalize(&mut self) {
        self.0.retain(|s| !s.is_default());
        self.0.sort_by(|a, b| a.guild_id.cmp(&b.guild_id));
        self.0.dedup_by(|a, b| a.guild_id == b.guild_id);
    }

    /// Settings of `guild_id`, or the defaults.
    #[must_use]
    pub fn get(&self, guild_id: &str) -> GuildSettings {
        self.0
            .iter()
            .find(|s| s.guild_id == guild_id)
            .cloned()
            .unwrap_or_else(|| GuildSettings::new(guild_id))
    }

    /// Replace the entry of `settings.guild_id`.
    pub fn set(&mut self, settings: GuildSettings) {
        self.0.retain(|s| s.guild_id != settings.guild_id);
        if !settings.is_default() {
            let at = self
                .0
                .partition_point(|s| s.guild_id < settings.guild_id);
            self.0.insert(at, settings);
        }
    }

    /// Keep only guilds in `active`. Returns how many were removed.
    pub fn retain_guilds(&mut self, active: &BTreeSet<String>) -> usize {
        let before = self.0.len();
        self.0.retain(|s| active.contains(&s.guild_id));
        before - self.0.len()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[GuildSettings] {
        &self.0
    }
}

async fn load(store: &DocumentStore) -> BotResult<SettingsList> {
    Ok(store
        .get_or_default::<SettingsList>(SETTINGS_DOCUMENT)
        .await?
        .normalized())
}

/// Settings of `guild_id`.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub async fn guild_settings(store: &DocumentStore, guild_id: &str) -> BotResult<GuildSettings> {
    Ok(load(store).await?.get(guild_id))
}

/// Whether `.mcstructure` uploads in `guild_id` are converted automatically.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub async fn is_auto_generation_enabled(store: &DocumentStore, guild_id: &str) -> BotResult<bool> {
    Ok(guild_settings(store, guild_id).await?.pack_auto_generation)
}

/// Turn automatic conversion on or off for `guild_id`.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
pub async fn set_auto_generation(
    store: &DocumentStore,
    guild_id: &str,
    enabled: bool,
) -> BotResult<GuildSettings> {
    let settings = store
        .update(SETTINGS_DOCUMENT, |list: &mut SettingsList| {
            list.normalize();
            let mut settings = list.get(guild_id);
            settings.pack_auto_generation = enabled;
            list.set(settings.clone());
            settings
        })
        .await?;
    tracing::info!(reason = %LogReason::Store, guild_id, enabled, "Updated auto generation");
    Ok(settings)
}

/// Forget guilds the bot is no longer in.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
pub async fn retain_guilds(store: &DocumentStore, active: &BTreeSet<String>) -> BotResult<usize> {
    let removed = store
        .update(SETTINGS_DOCUMENT, |list: &mut SettingsList| {
            list.normalize();
            list.retain_guilds(active)
        })
        .await?;
    if removed > 0 {
        tracing::info!(reason = %LogReason::Store, removed, "Pruned settings of departed guilds");
    }
    Ok(removed)
}

#[cfg(test)]
mod tests;
