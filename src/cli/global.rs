// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE     ← Additional config files (can repeat)
//! --log-level N     ← Console verbosity (0-6)
//! --file-log-level  ← File verbosity (falls back to --log-level)
//! --log-file FILE   ← logging.log_file override
//! --set KEY=VAL     ← Direct config override
//!
//! Precedence: CLI flags > --set > env > --config > erutcurts.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::error::Result;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Sets an option, such as 'store.backend=local' or 'deepl.enabled=false'.
    /// Can be specified multiple times.
    #[arg(short = 's', long = "set", value_name = "OPTION", action = clap::ArgAction::Append)]
    pub options: Vec<String>,

    /// Skips erutcurts.toml in the working directory, only uses --config.
    #[arg(long = "no-default-config")]
    pub no_default_config: bool,
}

impl GlobalOptions {
    /// Converts command-line options to `(key, value)` configuration overrides.
    ///
    /// `--set` entries come first so the dedicated flags win.
    ///
    /// # Errors
    ///
    /// Returns an error if a `--set` entry is not `key=value`.
    pub fn to_config_overrides(&self) -> Result<Vec<(String, String)>> {
        let mut overrides = self
            .options
            .iter()
            .map(|option| parse_override(option))
            .collect::<Result<Vec<_>>>()?;

        if let Some(level) = self.log_level {
            overrides.push(("logging.console_level".to_string(), level.to_string()));
        }

        // file_log_level falls back to log_level if not specified
        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(("logging.file_level".to_string(), level.to_string()));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(("logging.log_file".to_string(), path.display().to_string()));
        }

        Ok(overrides)
    }
}

/// Split `section.key=value`. Whitespace around both parts is dropped.
///
/// # Errors
///
/// Returns an error if there is no `=` or the key is empty.
pub fn parse_override(option: &str) -> Result<(String, String)> {
    let Some((key, value)) = option.split_once('=') else {
        anyhow::bail!("invalid option '{option}', expected KEY=VALUE");
    };
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("invalid option '{option}', the key is empty");
    }
    Ok((key.to_string(), value.trim().to_string()))
}
