// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

use super::types::{DeeplConfig, PathsConfig, StoreBackendKind};
use super::{Config, ConfigLoader};
use crate::logging::LogLevel;
use std::path::PathBuf;

const NO_ENV: [(&str, &str); 0] = [];

#[test]
fn test_default_config() {
    let config = Config::default();
    assert!(config.discord.token.is_empty());
    assert!(config.discord.auto_generation);
    assert_eq!(config.discord.shutdown_grace_secs, 3);
    assert!(config.deepl.enabled);
    assert_eq!(config.store.backend, StoreBackendKind::Discord);
    assert_eq!(config.store.dir, PathBuf::from("data"));
    assert_eq!(config.store.expire_after_access_secs, 180);
    assert_eq!(config.logging.console_level, LogLevel::INFO);
}

#[test]
fn test_store_backend_parse() {
    assert_eq!(
        "local".parse::<StoreBackendKind>().unwrap(),
        StoreBackendKind::Local
    );
    assert_eq!(
        "Discord".parse::<StoreBackendKind>().unwrap(),
        StoreBackendKind::Discord
    );
    let err = "sqlite".parse::<StoreBackendKind>().unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid value for 'backend' in section '[store]': expected 'discord' or 'local', got 'sqlite'"
    );
}

#[test]
fn test_log_level_bounds() {
    assert!(LogLevel::new(0).is_ok());
    assert!(LogLevel::new(6).is_ok());
    assert!(LogLevel::new(7).is_err());
}

#[test]
fn test_config_parse() {
    let toml = r#"
[discord]
token = "abc"
database_channel_id = 1078999999999999999
auto_generation = false

[store]
expire_after_access_secs = 60

[logging]
console_level = 4
"#;

    let config = Config::parse(toml).unwrap();
    assert_eq!(config.discord.token, "abc");
    assert_eq!(
        config.discord.database_channel_id,
        Some(1_078_999_999_999_999_999)
    );
    assert!(!config.discord.auto_generation);
    assert_eq!(config.store.backend, StoreBackendKind::Discord);
    assert_eq!(
        config.store.expire_after_access(),
        std::time::Duration::from_secs(60)
    );
    assert_eq!(config.logging.console_level, LogLevel::DEBUG);
}

#[test]
fn test_discord_store_without_channel_falls_back_to_local() {
    let config = Config::parse("[store]\nbackend = \"discord\"").unwrap();
    assert_eq!(config.store.backend, StoreBackendKind::Local);
}

#[test]
fn test_zero_expiry_is_rejected() {
    let err = Config::parse("[store]\nexpire_after_access_secs = 0").unwrap_err();
    assert!(err.to_string().contains("expire_after_access_secs"));
}

#[test]
fn test_validate_for_run_requires_token() {
    let config = Config::default();
    let err = config.validate_for_run().unwrap_err();
    assert_eq!(
        err.to_string(),
        "missing required config key 'token' in section '[discord]'"
    );

    let config = Config::parse("[discord]\ntoken = \"abc\"").unwrap();
    assert!(config.validate_for_run().is_ok());
}

#[test]
fn test_deepl_is_active() {
    let mut deepl = DeeplConfig::default();
    assert!(!deepl.is_active());
    deepl.auth_key = "key:fx".to_string();
    assert!(deepl.is_active());
    deepl.enabled = false;
    assert!(!deepl.is_active());
}

#[test]
fn test_paths_temp_dir_default() {
    let paths = PathsConfig::default();
    assert_eq!(paths.temp_dir(), std::env::temp_dir().join("Erutcurts"));

    let paths = PathsConfig {
        temp: Some(PathBuf::from("/scratch")),
        ..Default::default()
    };
    assert_eq!(paths.temp_dir(), PathBuf::from("/scratch"));
}

#[test]
fn test_config_loader_tracks_files() {
    let loader = ConfigLoader::new().add_toml_str("[discord]\n token = \"abc\"");

    let loaded_files = loader.loaded_files();
    assert_eq!(loaded_files.len(), 1);
    assert_eq!(loaded_files[0].0, "string");
    assert_eq!(loaded_files[0].1, PathBuf::from("<string>"));
}

#[test]
fn test_config_loader_format_loaded_files() {
    let loader = ConfigLoader::new()
        .add_toml_str("[discord]\n token = \"abc\"")
        .add_toml_str("[deepl]\n enabled = false");

    insta::assert_snapshot!(loader.format_loaded_files().join("\n"), @r"
    1. [string] <string>
    2. [string] <string>
    ");
}

#[test]
fn test_config_loader_optional_only_tracks_existing() {
    let loader = ConfigLoader::new().add_toml_file_optional("/nonexistent/path.toml");

    assert!(loader.loaded_files().is_empty());
}

#[test]
fn test_format_options_hides_sensitive() {
    let config = Config::builder()
        .add_toml_str(
            r#"
                [discord]
                token = "discord_secret"

                [deepl]
                auth_key = "deepl_secret:fx"
                "#,
        )
        .build()
        .unwrap();

    let formatted = config.format_options().join("\n");

    assert!(formatted.contains("discord.token"));
    assert!(formatted.contains("deepl.auth_key"));
    assert!(formatted.contains("[hidden]"));
    assert!(!formatted.contains("discord_secret"));
    assert!(!formatted.contains("deepl_secret"));
}

#[test]
fn test_format_options_sorted_and_aligned() {
    let config = Config::parse("[store]\nbackend = \"local\"").unwrap();
    let lines = config.format_options();

    let keys: Vec<&str> = lines
        .iter()
        .map(|line| line.split_whitespace().next().unwrap_or_default())
        .collect();
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(keys, sorted);

    let column = lines[0].find(" = ").unwrap();
    assert!(lines.iter().all(|line| line.find(" = ") == Some(column)));
    assert!(lines.contains(&format!("{:<column$} = local", "store.backend")));
}

#[test]
fn test_deny_unknown_fields_top_level() {
    let toml = r#"
[discord]
token = "abc"

[unknown_section]
foo = "bar"
"#;
    assert!(Config::parse(toml).is_err());
}

#[test]
fn test_deny_unknown_fields_section() {
    let result = Config::parse("[deepl]\nauth_kye = \"typo\"");
    let err = result.unwrap_err().to_string();
    assert!(err.contains("auth_kye"), "unexpected error: {err}");
}

// --- ConfigLoader Tests ---

#[test]
fn test_config_loader_add_toml_file_success() {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut file = NamedTempFile::new().expect("failed to create temp file");
    writeln!(
        file,
        r#"
[store]
backend = "local"
dir = "/srv/erutcurts"
"#
    )
    .expect("failed to write temp file");

    let config = ConfigLoader::new()
        .add_toml_file(file.path())
        .build()
        .expect("build should succeed");

    assert_eq!(config.store.backend, StoreBackendKind::Local);
    assert_eq!(config.store.dir, PathBuf::from("/srv/erutcurts"));
}

#[test]
fn test_config_loader_add_toml_file_not_found() {
    let loader = ConfigLoader::new().add_toml_file("/nonexistent/path/to/config.toml");

    assert!(loader.build().is_err());
}

#[test]
fn test_config_loader_add_toml_file_invalid_toml() {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut file = NamedTempFile::new().expect("failed to create temp file");
    writeln!(file, "this is not valid toml {{{{{{").expect("failed to write");

    let result = ConfigLoader::new().add_toml_file(file.path()).build();
    assert!(result.is_err(), "build should fail with invalid TOML");
}

#[test]
fn test_config_loader_with_env_prefix() {
    let config = ConfigLoader::new()
        .add_toml_str("[discord]\n auto_generation = true")
        .with_env_prefix("ERUTCURTS")
        .with_env_vars([
            ("ERUTCURTS_DISCORD_AUTO_GENERATION", "false"),
            ("ERUTCURTS_DISCORD_DATABASE_CHANNEL_ID", "42"),
            ("ERUTCURTS_LOGGING_CONSOLE_LEVEL", "5"),
            ("UNRELATED", "x"),
        ])
        .build()
        .expect("build should succeed");

    assert!(!config.discord.auto_generation);
    assert_eq!(config.discord.database_channel_id, Some(42));
    assert_eq!(config.logging.console_level, LogLevel::TRACE);
    assert_eq!(config.store.backend, StoreBackendKind::Discord);
}

#[test]
fn test_config_loader_legacy_env_beats_prefixed() {
    let config = ConfigLoader::new()
        .with_env_prefix("ERUTCURTS")
        .with_legacy_env()
        .with_env_vars([
            ("ERUTCURTS_DISCORD_TOKEN", "prefixed"),
            ("DISCORD_TOKEN", "legacy"),
            ("DEEPL_AUTH_KEY", "key:fx"),
            ("ADMIN_USER_ID", ""),
        ])
        .build()
        .expect("build should succeed");

    assert_eq!(config.discord.token, "legacy");
    assert_eq!(config.deepl.auth_key, "key:fx");
    assert_eq!(config.discord.admin_user_id, None);
}

#[test]
fn test_config_loader_legacy_env_off_by_default() {
    let config = ConfigLoader::new()
        .with_env_vars([("DISCORD_TOKEN", "legacy")])
        .build()
        .expect("build should succeed");

    assert!(config.discord.token.is_empty());
}

#[test]
fn test_config_loader_set_override() {
    let config = ConfigLoader::new()
        .add_toml_str("[deepl]\n enabled = true")
        .with_env_prefix("ERUTCURTS")
        .with_env_vars([("ERUTCURTS_DEEPL_ENABLED", "true")])
        .set("deepl.enabled", false)
        .expect("set should succeed")
        .build()
        .expect("build should succeed");

    assert!(!config.deepl.enabled, "set override should take effect");
}

#[test]
fn test_config_loader_set_unknown_key() {
    let result = ConfigLoader::new().set("discord.tokn", "abc");
    let err = result.err().expect("unknown key should fail");
    assert_eq!(err.to_string(), "Config error: unknown key 'discord.tokn'");
}

#[test]
fn test_config_loader_layered_sources() {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut file = NamedTempFile::new().expect("failed to create temp file");
    writeln!(
        file,
        r#"
[discord]
token = "file"
shutdown_grace_secs = 10

[deepl]
auth_key = "file-key"
"#
    )
    .expect("failed to write");

    let config = ConfigLoader::new()
        .add_toml_file(file.path())
        .add_toml_str(
            r#"
[discord]
token = "string"

[deepl]
api_url = "http://localhost:8080"
"#,
        )
        .with_env_vars(NO_ENV)
        .build()
        .expect("build should succeed");

    assert_eq!(config.discord.token, "string", "string should override file");
    assert_eq!(config.discord.shutdown_grace_secs, 10, "file value should persist");
    assert_eq!(config.deepl.auth_key, "file-key", "file value should persist");
    assert_eq!(
        config.deepl.api_url.as_deref(),
        Some("http://localhost:8080"),
        "string should add new value"
    );
}

#[test]
fn test_config_loader_build_deserialization_error() {
    let result = ConfigLoader::new()
        .add_toml_str("[discord]\n shutdown_grace_secs = \"soon\"")
        .build();

    assert!(result.is_err(), "build should fail with type mismatch");
}

#[test]
fn test_config_loader_default_impl() {
    let config1 = ConfigLoader::new().build().expect("build should succeed");
    let config2 = ConfigLoader::default().build().expect("build should succeed");

    assert_eq!(config1.discord.token, config2.discord.token);
    assert_eq!(config1.store.backend, config2.store.backend);
}
