// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Configuration loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file(req)
//!   .add_toml_file_optional(opt)
//!   .add_toml_str()
//!   .with_env_prefix("ERUTCURTS")
//!   .with_legacy_env()
//!   .set()
//!        |
//!        v
//!    build() --> Config
//!
//! build() applies: files < ERUTCURTS_* < legacy names < set()
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{Config, KNOWN_KEYS, LEGACY_ENV};
use crate::error::Result;

/// Builder for loading configuration from multiple sources.
#[derive(Debug)]
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    legacy_env: bool,
    env: Option<BTreeMap<String, String>>,
    overrides: Vec<(String, config::Value)>,
    files: Vec<(String, PathBuf)>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            legacy_env: false,
            env: None,
            overrides: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Adds a TOML configuration file to the loader.
    ///
    /// The file will be read when `build()` is called. If the file doesn't exist
    /// or contains invalid TOML, `build()` will return an error.
    #[must_use]
    pub fn add_toml_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(true));
        self.files.push(("file".to_string(), p.to_path_buf()));
        self
    }

    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(false));
        if p.exists() {
            self.files.push(("optional".to_string(), p.to_path_buf()));
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        use config::{File, FileFormat};
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.files
            .push(("string".to_string(), PathBuf::from("<string>")));
        self
    }

    /// Read `<PREFIX>_<SECTION>_<KEY>` variables, e.g. `ERUTCURTS_DISCORD_TOKEN`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Also read the plain names used by older deployments (`DISCORD_TOKEN`, ..).
    #[must_use]
    pub const fn with_legacy_env(mut self) -> Self {
        self.legacy_env = true;
        self
    }

    /// Use `vars` instead of the process environment.
    #[must_use]
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Sets a configuration override.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a known configuration key.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        if !KNOWN_KEYS.contains(&key) {
            anyhow::bail!("Config error: unknown key '{key}'");
        }
        self.overrides.push((key.to_string(), value.into()));
        Ok(self)
    }

    /// Builds the configuration from all added sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required configuration files are missing.
    /// - Configuration files have invalid TOML syntax.
    /// - An override cannot be applied.
    /// - The merged configuration cannot be deserialized into the `Config` struct.
    /// - Validation fails (see [`Config::resolve_and_validate`]).
    pub fn build(self) -> Result<Config> {
        let env = self
            .env
            .unwrap_or_else(|| std::env::vars().collect::<BTreeMap<_, _>>());

        let mut layered: Vec<(String, config::Value)> = Vec::new();
        if let Some(prefix) = &self.env_prefix {
            for key in KNOWN_KEYS {
                let name = format!("{prefix}_{}", key.replace('.', "_")).to_uppercase();
                if let Some(value) = env.get(&name).filter(|v| !v.is_empty()) {
                    layered.push(((*key).to_string(), value.clone().into()));
                }
            }
        }
        if self.legacy_env {
            for (name, key) in LEGACY_ENV {
                if let Some(value) = env.get(*name).filter(|v| !v.is_empty()) {
                    layered.push(((*key).to_string(), value.clone().into()));
                }
            }
        }
        layered.extend(self.overrides);

        let mut builder = self.builder;
        for (key, value) in layered {
            builder = builder
                .set_override(&key, value)
                .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
        }

        let cfg = builder.build()?;
        let mut config: Config = cfg.try_deserialize()?;
        config.resolve_and_validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn loaded_files(&self) -> Vec<(String, PathBuf)> {
        self.files.clone()
    }

    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, (source, path))| format!("{}. [{}] {}", i + 1, source, path.display()))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
