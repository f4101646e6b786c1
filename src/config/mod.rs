// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Configuration management for erutcurts.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. erutcurts.toml (cwd, optional)
//! 3. --config FILE
//! 4. ERUTCURTS_* env vars
//! 5. legacy env names (DISCORD_TOKEN, DEEPL_AUTH_KEY, ...)
//! 6. CLI overrides (--set)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! ERUTCURTS_DISCORD_TOKEN=...           → discord.token
//! ERUTCURTS_STORE_BACKEND=local         → store.backend = "local"
//! ERUTCURTS_LOGGING_CONSOLE_LEVEL=4     → logging.console_level = 4
//! DATABASE_CHANNEL_ID=123               → discord.database_channel_id = 123
//! ```

pub mod loader;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::logging::LogReason;

use loader::ConfigLoader;
use types::{DeeplConfig, DiscordConfig, LoggingConfig, PathsConfig, StoreBackendKind, StoreConfig};

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "erutcurts.toml";

/// Prefix of `ERUTCURTS_<SECTION>_<KEY>` variables.
pub const ENV_PREFIX: &str = "ERUTCURTS";

/// Every settable key, as `section.key`.
pub const KNOWN_KEYS: &[&str] = &[
    "discord.token",
    "discord.admin_guild_id",
    "discord.admin_user_id",
    "discord.notification_channel_id",
    "discord.database_channel_id",
    "discord.changelogs_channel_id",
    "discord.auto_generation",
    "discord.shutdown_grace_secs",
    "deepl.auth_key",
    "deepl.api_url",
    "deepl.enabled",
    "store.backend",
    "store.dir",
    "store.expire_after_access_secs",
    "paths.resources",
    "paths.temp",
    "logging.console_level",
    "logging.file_level",
    "logging.log_file",
];

/// Plain variable names kept for existing deployments.
pub const LEGACY_ENV: &[(&str, &str)] = &[
    ("DISCORD_TOKEN", "discord.token"),
    ("ADMIN_GUILD_ID", "discord.admin_guild_id"),
    ("ADMIN_USER_ID", "discord.admin_user_id"),
    ("NOTIFICATION_CHANNEL_ID", "discord.notification_channel_id"),
    ("DATABASE_CHANNEL_ID", "discord.database_channel_id"),
    ("CHANGELOGS_CHANNEL_ID", "discord.changelogs_channel_id"),
    ("DEEPL_AUTH_KEY", "deepl.auth_key"),
];

const HIDDEN: &str = "[hidden]";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub discord: DiscordConfig,
    pub deepl: DeeplConfig,
    pub store: StoreConfig,
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use erutcurts::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("erutcurts.toml")
    ///     .with_env_prefix("ERUTCURTS")
    ///     .with_legacy_env()
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Normalize values that depend on each other.
    ///
    /// A `discord` store without `database_channel_id` falls back to `local`.
    ///
    /// # Errors
    ///
    /// Returns an error if `store.expire_after_access_secs` is zero.
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        if self.store.backend == StoreBackendKind::Discord
            && self.discord.database_channel_id.is_none()
        {
            tracing::warn!(
                reason = %LogReason::Config,
                dir = %self.store.dir.display(),
                "discord.database_channel_id is not set, using the local store"
            );
            self.store.backend = StoreBackendKind::Local;
        }
        if self.store.expire_after_access_secs == 0 {
            return Err(ConfigError::InvalidValue {
                section: "store".to_string(),
                key: "expire_after_access_secs".to_string(),
                message: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Checks what `run` needs on top of [`Self::resolve_and_validate`].
    ///
    /// # Errors
    ///
    /// Returns an error if `discord.token` is empty.
    pub fn validate_for_run(&self) -> Result<()> {
        if self.discord.token.trim().is_empty() {
            return Err(ConfigError::MissingKey {
                section: "discord".to_string(),
                key: "token".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Sensitive fields are hidden with `[hidden]`. Unset optional values are
    /// printed empty. Output is ordered by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_discord_options(&mut options);
        self.format_deepl_options(&mut options);
        self.format_store_options(&mut options);
        self.format_paths_options(&mut options);
        self.format_logging_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_discord_options(&self, options: &mut BTreeMap<String, String>) {
        let id = |id: Option<u64>| id.map_or_else(String::new, |id| id.to_string());

        options.insert("discord.token".into(), secret(&self.discord.token));
        options.insert(
            "discord.admin_guild_id".into(),
            id(self.discord.admin_guild_id),
        );
        options.insert(
            "discord.admin_user_id".into(),
            id(self.discord.admin_user_id),
        );
        options.insert(
            "discord.notification_channel_id".into(),
            id(self.discord.notification_channel_id),
        );
        options.insert(
            "discord.database_channel_id".into(),
            id(self.discord.database_channel_id),
        );
        options.insert(
            "discord.changelogs_channel_id".into(),
            id(self.discord.changelogs_channel_id),
        );
        options.insert(
            "discord.auto_generation".into(),
            self.discord.auto_generation.to_string(),
        );
        options.insert(
            "discord.shutdown_grace_secs".into(),
            self.discord.shutdown_grace_secs.to_string(),
        );
    }

    fn format_deepl_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("deepl.auth_key".into(), secret(&self.deepl.auth_key));
        options.insert(
            "deepl.api_url".into(),
            self.deepl.api_url.clone().unwrap_or_default(),
        );
        options.insert("deepl.enabled".into(), self.deepl.enabled.to_string());
    }

    fn format_store_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("store.backend".into(), self.store.backend.to_string());
        options.insert("store.dir".into(), self.store.dir.display().to_string());
        options.insert(
            "store.expire_after_access_secs".into(),
            self.store.expire_after_access_secs.to_string(),
        );
    }

    fn format_paths_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("paths.resources".into(), path(self.paths.resources.as_ref()));
        options.insert(
            "paths.temp".into(),
            self.paths.temp_dir().display().to_string(),
        );
    }

    fn format_logging_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "logging.console_level".into(),
            self.logging.console_level.as_u8().to_string(),
        );
        options.insert(
            "logging.file_level".into(),
            self.logging.file_level.as_u8().to_string(),
        );
        options.insert("logging.log_file".into(), path(self.logging.log_file.as_ref()));
    }
}

fn secret(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        HIDDEN.to_string()
    }
}

fn path(p: Option<&PathBuf>) -> String {
    p.map_or_else(String::new, |p| p.display().to_string())
}
