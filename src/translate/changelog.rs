// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::TranslateError;

pub const MINECRAFT_SERVER_NAME: &str = "MINECRAFT";

/// Locale changelogs are written in.
pub const SOURCE_LOCALE: &str = "en-US";

pub const THREAD_NAME_LIMIT: usize = 100;
pub const MESSAGE_LIMIT: usize = 2000;

const CHANNEL_PREFIX: char = '#';
const FALLBACK_THREAD_NAME: &str = "Changelog";

/// Game versions and snapshots, e.g. `1.19.50`, `1.20.0.23`, `23w07a`.
pub static VERSION_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+(?:\.\d+)?|\d+w\d+a"));

/// Source of a crossposted message, parsed from the webhook author name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowingChannel {
    pub server_name: String,
    pub channel_name: String,
}

impl FollowingChannel {
    #[must_use]
    pub fn new(server_name: impl Into<String>, channel_name: impl Into<String>) -> Self {
        Self {
            server_name: server_name.into(),
            channel_name: channel_name.into(),
        }
    }

    /// Parse `"MINECRAFT #java-changelogs"`.
    ///
    /// Channel names cannot contain `#`, so the last one separates the parts.
    #[must_use]
    pub fn from_author_name(name: &str) -> Option<Self> {
        let (server, channel) = name.rsplit_once(CHANNEL_PREFIX)?;
        let server = server.strip_suffix(' ').unwrap_or(server);
        Some(Self::new(server, channel))
    }
}

impl fmt::Display for FollowingChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {CHANNEL_PREFIX}{}", self.server_name, self.channel_name)
    }
}

/// Changelog announcement channels the bot translates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangelogKind {
    Java,
    Bedrock,
}

impl ChangelogKind {
    pub const ALL: [Self; 2] = [Self::Java, Self::Bedrock];

    #[must_use]
    pub const fn channel_name(self) -> &'static str {
        match self {
            Self::Java => "java-changelogs",
            Self::Bedrock => "bedrock-changelogs",
        }
    }

    #[must_use]
    pub fn following_channel(self) -> FollowingChannel {
        FollowingChannel::new(MINECRAFT_SERVER_NAME, self.channel_name())
    }

    #[must_use]
    pub fn from_following(channel: &FollowingChannel) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.following_channel() == *channel)
    }

    /// Kind of a crossposted message whose author is `author_name`.
    #[must_use]
    pub fn from_author_name(author_name: &str) -> Option<Self> {
        Self::from_following(&FollowingChannel::from_author_name(author_name)?)
    }
}

/// First line of `content`, empty when there is none.
#[must_use]
pub fn first_line(content: &str) -> &str {
    content.lines().next().unwrap_or_default()
}

/// Name for the thread under a changelog, within Discord's limit.
#[must_use]
pub fn thread_name(content: &str) -> String {
    let line = first_line(content).trim();
    if line.is_empty() {
        return FALLBACK_THREAD_NAME.to_string();
    }
    line.chars().take(THREAD_NAME_LIMIT).collect()
}

/// First game version mentioned in `text`.
///
/// # Errors
///
/// Returns [`TranslateError::Pattern`] if the version pattern is invalid.
pub fn find_version(text: &str) -> Result<Option<&str>, TranslateError> {
    let pattern = VERSION_PATTERN
        .as_ref()
        .map_err(|e| TranslateError::Pattern(e.clone()))?;
    Ok(pattern.find(text).map(|m| m.as_str()))
}

/// Split `text` into messages of at most `limit` chars, preferring line breaks.
#[must_use]
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut messages = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();
        if current_len + line_len > limit && !current.is_empty() {
            messages.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len > limit {
            // a single overlong line is cut hard
            let chars: Vec<char> = line.chars().collect();
            for chunk in chars.chunks(limit) {
                let chunk: String = chunk.iter().collect();
                if chunk.chars().count() == limit {
                    messages.push(chunk);
                } else {
                    current_len = chunk.chars().count();
                    current = chunk;
                }
            }
            continue;
        }
        current.push_str(line);
        current_len += line_len;
    }
    if !current.trim().is_empty() {
        messages.push(current);
    }
    messages
        .into_iter()
        .map(|m| m.trim_end_matches('\n').to_string())
        .filter(|m| !m.is_empty())
        .collect()
}
