// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Per-channel package mode.
//!
//! ```text
//!            /package start
//!   off  ------------------------->  on
//!        <-------------------------
//!     /package cancel | /package convert (converts collected files)
//!
//! State after a restart: newest bot reply to a state-changing
//! `/package <sub>` within the last 50 messages; on iff <sub> = start.
//! ```

use std::sync::Mutex;
use std::time::Duration;

use crate::store::ExpiringCache;

pub const COMMAND_NAME: &str = "package";

/// Messages scanned for the state, and collected on convert.
pub const MESSAGE_HISTORY_LIMIT: u8 = 50;

pub const EMBED_TITLE: &str = "パッケージ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageSubcommand {
    Start,
    Cancel,
    Convert,
    Status,
}

impl PackageSubcommand {
    pub const ALL: [Self; 4] = [Self::Start, Self::Cancel, Self::Convert, Self::Status];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Cancel => "cancel",
            Self::Convert => "convert",
            Self::Status => "status",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Start => "パッケージを開始します",
            Self::Cancel => "パッケージをキャンセルします",
            Self::Convert => "パッケージに含まれるファイルをまとめて変換します",
            Self::Status => "パッケージの状態を確認します",
        }
    }

    /// Package mode after running, or `None` when the state is untouched.
    #[must_use]
    pub const fn state_after(self) -> Option<bool> {
        match self {
            Self::Start => Some(true),
            Self::Cancel | Self::Convert => Some(false),
            Self::Status => None,
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|sub| sub.name().eq_ignore_ascii_case(name))
    }

    /// Subcommand of an interaction named like `package start`.
    #[must_use]
    pub fn from_interaction_name(name: &str) -> Option<Self> {
        let mut parts = name.split(' ');
        let command = parts.next()?;
        if !command.eq_ignore_ascii_case(COMMAND_NAME) {
            return None;
        }
        Self::from_name(parts.next()?)
    }
}

/// What running a subcommand does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageOutcome {
    /// Convert the files posted since the start message.
    Convert,
    /// Reply with this description.
    Reply(&'static str),
}

/// Decide the outcome of `sub` while package mode is `enabled`.
#[must_use]
pub fn outcome(sub: PackageSubcommand, enabled: bool) -> PackageOutcome {
    if enabled && sub == PackageSubcommand::Convert {
        return PackageOutcome::Convert;
    }
    let after = sub.state_after();
    if after == Some(enabled) {
        return PackageOutcome::Reply(if enabled {
            "既に開始されています"
        } else {
            "開始されていません"
        });
    }
    PackageOutcome::Reply(match sub {
        PackageSubcommand::Start => "開始しました",
        PackageSubcommand::Cancel => "キャンセルしました",
        PackageSubcommand::Convert => "パッケージが開始されていません",
        PackageSubcommand::Status if enabled => "開始されています",
        PackageSubcommand::Status => "開始されていません",
    })
}

/// The parts of a channel message the state scan looks at.
pub trait ChannelMessage {
    /// Sent by this bot.
    fn is_self(&self) -> bool;

    /// Name of the interaction the message answers, e.g. `package start`.
    fn interaction_name(&self) -> Option<&str>;

    /// Id of the interaction the message answers.
    fn interaction_id(&self) -> Option<u64>;
}

/// The message that started the current package, if package mode is on.
///
/// `history` is newest first. The reply to interaction `running`, which is
/// still being handled, does not count.
pub fn find_start_message<'m, M: ChannelMessage>(
    history: impl IntoIterator<Item = &'m M>,
    running: Option<u64>,
) -> Option<&'m M> {
    history
        .into_iter()
        .take(usize::from(MESSAGE_HISTORY_LIMIT))
        .filter(|message| message.is_self())
        .filter(|message| running.is_none() || message.interaction_id() != running)
        .find_map(|message| {
            let sub = PackageSubcommand::from_interaction_name(message.interaction_name()?)?;
            Some((message, sub.state_after()?))
        })
        .filter(|(_, enabled)| *enabled)
        .map(|(message, _)| message)
}

/// Known package states, keyed by channel id.
#[derive(Debug)]
pub struct PackageModes {
    cache: Mutex<ExpiringCache<u64, bool>>,
}

impl Default for PackageModes {
    fn default() -> Self {
        Self::new(crate::store::DEFAULT_EXPIRE_AFTER_ACCESS)
    }
}

impl PackageModes {
    #[must_use]
    pub fn new(expire_after_access: Duration) -> Self {
        Self {
            cache: Mutex::new(ExpiringCache::new(expire_after_access)),
        }
    }

    /// Cached state of `channel_id`; `None` means the history must be scanned.
    #[must_use]
    pub fn cached(&self, channel_id: u64) -> Option<bool> {
        let mut cache = self.cache.lock().ok()?;
        cache.drain_expired();
        cache.get(&channel_id).copied()
    }

    pub fn set(&self, channel_id: u64, enabled: bool) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(channel_id, enabled);
        }
    }

    /// Record the state change caused by `sub` when it differs from `enabled`.
    pub fn apply(&self, channel_id: u64, sub: PackageSubcommand, enabled: bool) {
        if let Some(after) = sub.state_after()
            && after != enabled
        {
            self.set(channel_id, after);
        }
    }
}
