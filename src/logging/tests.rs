// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

use super::{LogConfig, LogLevel, LogReason};

#[test]
fn test_log_level_bounds() {
    assert!(LogLevel::new(0).is_ok());
    assert!(LogLevel::new(6).is_ok());
    assert!(LogLevel::new(7).is_err());
    assert_eq!(LogLevel::from_u8(9), None);
}

#[test]
fn test_log_level_filter_caps_dependencies() {
    assert_eq!(LogLevel::INFO.to_filter_string(), "warn,erutcurts=info");
    assert_eq!(LogLevel::DUMP.to_filter_string(), "trace");
    assert_eq!(LogLevel::SILENT.to_filter_string(), "off");
    assert_eq!(LogLevel::SILENT.to_tracing_level(), None);
}

#[test]
fn test_log_level_deserialize_rejects_out_of_range() {
    let ok: LogLevel = serde_json::from_str("4").unwrap();
    assert_eq!(ok, LogLevel::DEBUG);
    assert!(serde_json::from_str::<LogLevel>("12").is_err());
}

#[test]
fn test_log_config_builder_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::DEBUG);
    assert!(config.log_file().is_none());

    let config = LogConfig::builder()
        .with_console_level(LogLevel::WARN)
        .with_log_file("bot.log".to_string())
        .build();
    assert_eq!(config.console_level(), LogLevel::WARN);
    assert_eq!(config.log_file(), Some("bot.log"));
}

#[test]
fn test_log_reason_strings() {
    let reasons = [
        LogReason::Discord,
        LogReason::Convert,
        LogReason::Store,
        LogReason::Translate,
        LogReason::Config,
        LogReason::Filesystem,
        LogReason::Network,
    ]
    .map(|r| r.to_string());
    insta::assert_debug_snapshot!(reasons, @r#"
    [
        "discord",
        "convert",
        "store",
        "translate",
        "config",
        "fs",
        "net",
    ]
    "#);
}
