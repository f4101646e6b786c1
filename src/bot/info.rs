// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Static bot information and the help text.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

/// Fixed identity of the bot.
pub struct BotInfo;

impl BotInfo {
    pub const NAME: &'static str = "Erutcurts";
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");
    pub const DEVELOPER: &'static str = "Risu (@risu729)";
    pub const GITHUB_URL: &'static str = "https://github.com/risu729/erutcurts";
    pub const ACTIVITY: &'static str = "Minecraft Bedrock Edition";
    /// Locale of the built-in messages.
    pub const DEFAULT_LOCALE: &'static str = "ja";
    pub const RUST_VERSION: &'static str = env!("CARGO_PKG_RUST_VERSION");
    pub const LIBRARY: &'static str = "poise 0.6 / serenity 0.12";
}

/// Date shown on the help embed.
pub const HELP_LAST_EDIT: (i32, u32, u32) = (2023, 3, 10);

const SAMPLES_VERSION_FILE: [&str; 2] = ["bedrock-samples", "version.json"];
const UNKNOWN: &str = "unknown";

/// Unix seconds of [`HELP_LAST_EDIT`] at midnight UTC.
#[must_use]
pub fn help_timestamp() -> Option<i64> {
    let (year, month, day) = HELP_LAST_EDIT;
    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
}

#[derive(Debug, Deserialize)]
struct SamplesVersion {
    version: String,
}

/// `latest.version` of `<resources>/bedrock-samples/version.json`.
#[must_use]
pub fn bedrock_samples_version(resources: Option<&Path>) -> String {
    let Some(dir) = resources else {
        return UNKNOWN.to_string();
    };
    let path = SAMPLES_VERSION_FILE
        .iter()
        .fold(dir.to_path_buf(), |path, part| path.join(part));
    std::fs::read_to_string(&path)
        .ok()
        .and_then(|json| serde_json::from_str::<BTreeMap<String, SamplesVersion>>(&json).ok())
        .and_then(|mut versions| versions.remove("latest"))
        .map_or_else(|| UNKNOWN.to_string(), |latest| latest.version)
}

/// Help description. `contact` is the admin's tag, if known.
#[must_use]
pub fn help_description(contact: Option<&str>) -> String {
    let contact = contact.unwrap_or("管理者");
    format!(
        "このBotは、Minecraft Bedrock Edition の技術勢に向けたBotです。\n\
         \n\
         **機能一覧**\n\
         ・ ストラクチャーファイル(.mcstructure)をビヘイビアパック・ワールドへ自動で変換します。\n\
         \n\
         **コマンド一覧**\n\
         ・ /help このヘルプを表示します。\n\
         ・ /convert ストラクチャーファイルを変換します。\n\
         ・ /package 自動変換を一時停止し、/package convert で送信したファイルをまとめて変換します。\n\
         ・ /settings 設定を確認・変更します。\n\
         \n\
         **iOSへの対応について**\n\
         iOSでは、Discordアプリからファイル送信ができないため、ファイルアプリなどから\"共有\"でDiscordへ送信してください。\n\
         /convert コマンドでファイルを添付することもできないため、複数ファイルをまとめて変換したいときや、ワールドへ変換したいときは、/package コマンドを使用して上記の方法で送信してください。\n\
         \n\
         **サポート**\n\
         何か質問があれば、{contact} までDMでお問い合わせください。\n\
         また、GitHubのIssueへの投稿も歓迎します。"
    )
}

/// Inputs of [`info_fields`] that are only known at runtime.
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub supported_languages: Vec<String>,
    pub samples_version: String,
    pub start_time: DateTime<Utc>,
    pub ping_ms: i64,
}

/// Name/value pairs of the `/help info` embed, in display order.
#[must_use]
pub fn info_fields(runtime: &RuntimeInfo) -> Vec<(&'static str, String)> {
    let languages = if runtime.supported_languages.is_empty() {
        BotInfo::DEFAULT_LOCALE.to_string()
    } else {
        runtime.supported_languages.join(", ")
    };
    vec![
        ("Name", BotInfo::NAME.to_string()),
        ("Version", BotInfo::VERSION.to_string()),
        ("Developer", BotInfo::DEVELOPER.to_string()),
        ("Supported Languages", languages),
        ("Rust Version", BotInfo::RUST_VERSION.to_string()),
        (
            "Server OS",
            format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
        ),
        ("Library Version", BotInfo::LIBRARY.to_string()),
        ("Bedrock Samples Version", runtime.samples_version.clone()),
        (
            "Start Time",
            runtime.start_time.format("%Y-%m-%dT%H:%MZ").to_string(),
        ),
        ("Ping", format!("{} ms", runtime.ping_ms)),
    ]
}
