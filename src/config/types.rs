// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Configuration sections.
//!
//! ```text
//! Config: DiscordConfig, DeeplConfig, StoreConfig, PathsConfig, LoggingConfig
//! StoreBackendKind: discord (default) | local
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Discord connection and channel ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscordConfig {
    /// Bot token.
    pub token: String,
    /// Guild whose members may see admin-only output.
    pub admin_guild_id: Option<u64>,
    /// User who receives admin-only output.
    pub admin_user_id: Option<u64>,
    /// Channel for lifecycle and error notifications.
    pub notification_channel_id: Option<u64>,
    /// Forum channel holding the document store.
    pub database_channel_id: Option<u64>,
    /// Channel where changelogs get translation threads.
    pub changelogs_channel_id: Option<u64>,
    /// Global switch for converting uploads automatically.
    pub auto_generation: bool,
    /// Seconds to wait for in-flight work on shutdown.
    pub shutdown_grace_secs: u64,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            admin_guild_id: None,
            admin_user_id: None,
            notification_channel_id: None,
            database_channel_id: None,
            changelogs_channel_id: None,
            auto_generation: true,
            shutdown_grace_secs: 3,
        }
    }
}

impl DiscordConfig {
    #[must_use]
    pub const fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// DeepL translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeeplConfig {
    /// API key; translation is off while empty.
    pub auth_key: String,
    /// API host override. The plan of the key decides otherwise.
    pub api_url: Option<String>,
    pub enabled: bool,
}

impl Default for DeeplConfig {
    fn default() -> Self {
        Self {
            auth_key: String::new(),
            api_url: None,
            enabled: true,
        }
    }
}

impl DeeplConfig {
    /// Enabled and a key is present.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.enabled && !self.auth_key.is_empty()
    }
}

/// Where documents are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    /// Forum posts in `discord.database_channel_id`.
    #[default]
    Discord,
    /// JSON files in `store.dir`.
    Local,
}

impl std::fmt::Display for StoreBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discord => write!(f, "discord"),
            Self::Local => write!(f, "local"),
        }
    }
}

impl std::str::FromStr for StoreBackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "discord" => Ok(Self::Discord),
            "local" => Ok(Self::Local),
            _ => Err(ConfigError::InvalidValue {
                section: "store".to_string(),
                key: "backend".to_string(),
                message: format!("expected 'discord' or 'local', got '{s}'"),
            }),
        }
    }
}

/// Document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub backend: StoreBackendKind,
    /// Directory of the local backend.
    pub dir: PathBuf,
    /// Cached documents are written back after this much idle time.
    pub expire_after_access_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackendKind::Discord,
            dir: PathBuf::from("data"),
            expire_after_access_secs: 180,
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub const fn expire_after_access(&self) -> Duration {
        Duration::from_secs(self.expire_after_access_secs)
    }
}

/// Filesystem locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory with optional `pack_icon.png`, `world_icon.jpeg`,
    /// `first_load_function.mcfunction` and `template_level.dat`.
    pub resources: Option<PathBuf>,
    /// Scratch directory, recreated at bot start.
    pub temp: Option<PathBuf>,
}

impl PathsConfig {
    /// `temp`, or `<system temp>/Erutcurts`.
    #[must_use]
    pub fn temp_dir(&self) -> PathBuf {
        self.temp
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("Erutcurts"))
    }
}

/// Logging output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level for console output (0-6).
    pub console_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_level: LogLevel,
    /// Path to log file.
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_level: LogLevel::INFO,
            file_level: LogLevel::DEBUG,
            log_file: None,
        }
    }
}
