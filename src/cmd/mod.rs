// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   config, convert, level_versions, run
//! ```

pub mod config;
pub mod convert;
pub mod level_versions;
pub mod run;

use std::sync::Arc;

use crate::cli::global::GlobalOptions;
use crate::config::loader::ConfigLoader;
use crate::config::{Config, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use crate::error::Result;
use crate::store::{DocumentStore, LocalBackend};

/// Loader for every configuration source named by `global`.
///
/// # Errors
///
/// Returns an error if a `--set` entry is malformed or names an unknown key.
pub fn build_config_loader(global: &GlobalOptions) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX).with_legacy_env();
    for (key, value) in global.to_config_overrides()? {
        loader = loader.set(&key, value)?;
    }
    Ok(loader)
}

/// # Errors
///
/// See [`build_config_loader`] and [`ConfigLoader::build`].
pub fn load_config(global: &GlobalOptions) -> Result<Config> {
    build_config_loader(global)?.build()
}

/// Store over `store.dir`, used by the offline commands.
#[must_use]
pub fn open_local_store(config: &Config) -> DocumentStore {
    DocumentStore::new(
        Arc::new(LocalBackend::new(&config.store.dir)),
        config.store.expire_after_access(),
    )
}
