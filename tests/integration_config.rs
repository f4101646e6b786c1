// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic TOML files on disk and layered
//! sources.

use std::path::{Path, PathBuf};

use erutcurts::config::Config;
use erutcurts::config::loader::ConfigLoader;
use erutcurts::config::types::StoreBackendKind;
use erutcurts::logging::LogLevel;
use tempfile::TempDir;

const NO_ENV: [(&str, &str); 0] = [];

const FULL_CONFIG: &str = r#"
[discord]
token = "secret-token"
admin_guild_id = 100
admin_user_id = 200
notification_channel_id = 300
database_channel_id = 400
changelogs_channel_id = 500
auto_generation = false
shutdown_grace_secs = 5

[deepl]
auth_key = "deepl-key:fx"
enabled = true

[store]
backend = "discord"
dir = "store-data"
expire_after_access_secs = 60

[paths]
resources = "resources"
temp = "tmp/erutcurts"

[logging]
console_level = 4
file_level = 5
log_file = "erutcurts.log"
"#;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

// =============================================================================
// Loading from files
// =============================================================================

#[test]
fn config_full_file() {
    let dir = temp_dir();
    let path = write_file(dir.path(), "erutcurts.toml", FULL_CONFIG);

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.discord.token, "secret-token");
    assert_eq!(config.discord.admin_guild_id, Some(100));
    assert_eq!(config.discord.admin_user_id, Some(200));
    assert_eq!(config.discord.notification_channel_id, Some(300));
    assert_eq!(config.discord.database_channel_id, Some(400));
    assert_eq!(config.discord.changelogs_channel_id, Some(500));
    assert!(!config.discord.auto_generation);
    assert_eq!(config.discord.shutdown_grace().as_secs(), 5);
    assert!(config.deepl.is_active());
    assert_eq!(config.store.backend, StoreBackendKind::Discord);
    assert_eq!(config.store.dir, PathBuf::from("store-data"));
    assert_eq!(config.store.expire_after_access().as_secs(), 60);
    assert_eq!(config.paths.temp_dir(), PathBuf::from("tmp/erutcurts"));
    assert_eq!(config.logging.console_level, LogLevel::DEBUG);
    assert_eq!(config.logging.file_level, LogLevel::TRACE);
    assert_eq!(config.logging.log_file, Some(PathBuf::from("erutcurts.log")));
    config.validate_for_run().unwrap();
}

#[test]
fn config_full_file_options_hide_secrets() {
    let dir = temp_dir();
    let path = write_file(dir.path(), "erutcurts.toml", FULL_CONFIG);
    let options = Config::from_file(&path).unwrap().format_options();

    let joined = options.join("\n");
    assert!(!joined.contains("secret-token"));
    assert!(!joined.contains("deepl-key"));
    assert!(
        options
            .iter()
            .any(|line| line.starts_with("discord.token") && line.ends_with("[hidden]"))
    );
    assert!(
        options
            .iter()
            .any(|line| line.starts_with("store.backend") && line.ends_with("discord"))
    );
}

#[test]
fn config_discord_backend_without_forum_falls_back_to_local() {
    let dir = temp_dir();
    let path = write_file(
        dir.path(),
        "erutcurts.toml",
        "[store]\nbackend = \"discord\"\n",
    );

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.store.backend, StoreBackendKind::Local);
}

#[test]
fn config_unknown_key_rejected() {
    let dir = temp_dir();
    let path = write_file(dir.path(), "erutcurts.toml", "[discord]\nprefix = \"!\"\n");

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn config_invalid_log_level_rejected() {
    let dir = temp_dir();
    let path = write_file(dir.path(), "erutcurts.toml", "[logging]\nconsole_level = 9\n");

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn config_run_requires_token() {
    let config = Config::parse("[deepl]\nenabled = false\n").unwrap();
    let err = config.validate_for_run().unwrap_err();
    assert_eq!(
        err.to_string(),
        "missing required config key 'token' in section '[discord]'"
    );
}

// =============================================================================
// Layered sources
// =============================================================================

#[test]
fn config_later_files_override_earlier() {
    let dir = temp_dir();
    let base = write_file(
        dir.path(),
        "base.toml",
        "[discord]\ntoken = \"base\"\nshutdown_grace_secs = 10\n",
    );
    let local = write_file(dir.path(), "local.toml", "[discord]\ntoken = \"local\"\n");

    let config = ConfigLoader::new()
        .add_toml_file(&base)
        .add_toml_file(&local)
        .with_env_vars(NO_ENV)
        .build()
        .unwrap();

    assert_eq!(config.discord.token, "local");
    assert_eq!(config.discord.shutdown_grace_secs, 10);
}

#[test]
fn config_env_and_set_override_files() {
    let dir = temp_dir();
    let path = write_file(
        dir.path(),
        "erutcurts.toml",
        "[discord]\ntoken = \"file\"\n[store]\nexpire_after_access_secs = 30\n",
    );

    let config = ConfigLoader::new()
        .add_toml_file(&path)
        .with_env_prefix("ERUTCURTS")
        .with_legacy_env()
        .with_env_vars([
            ("ERUTCURTS_STORE_EXPIRE_AFTER_ACCESS_SECS", "90"),
            ("DISCORD_TOKEN", "from-env"),
        ])
        .set("logging.console_level", 5)
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.discord.token, "from-env");
    assert_eq!(config.store.expire_after_access_secs, 90);
    assert_eq!(config.logging.console_level, LogLevel::TRACE);
}

#[test]
fn config_loaded_files_listed_in_order() {
    let dir = temp_dir();
    let first = write_file(dir.path(), "first.toml", "");
    let second = write_file(dir.path(), "second.toml", "");

    let loader = ConfigLoader::new()
        .add_toml_file(&first)
        .add_toml_file_optional(dir.path().join("missing.toml"))
        .add_toml_file_optional(&second);

    let files: Vec<PathBuf> = loader
        .loaded_files()
        .into_iter()
        .map(|(_, path)| path)
        .collect();
    assert_eq!(files, [first, second]);
}

#[test]
fn config_missing_required_file_fails() {
    let dir = temp_dir();
    let result = ConfigLoader::new()
        .add_toml_file(dir.path().join("missing.toml"))
        .with_env_vars(NO_ENV)
        .build();

    assert!(result.is_err());
}
