// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Slash commands.
//!
//! ```text
//! global       /convert  /package  /help  /settings
//! admin guild  /store flush   (owners only)
//! ```

pub mod admin;
pub mod convert;
pub mod help;
pub mod package;
pub mod settings;

use crate::pack::TargetType;

use super::{Data, Error};

/// Every command, global ones first.
#[must_use]
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        convert::convert(),
        package::command(),
        help::help(),
        settings::settings(),
        admin::store(),
    ]
}

/// `type` option of `/convert` and `/package convert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum TargetChoice {
    #[name = "behavior"]
    Behavior,
    #[name = "single-behavior"]
    SingleBehavior,
    #[name = "world"]
    World,
}

impl From<TargetChoice> for TargetType {
    fn from(choice: TargetChoice) -> Self {
        match choice {
            TargetChoice::Behavior => Self::Behavior,
            TargetChoice::SingleBehavior => Self::SingleBehavior,
            TargetChoice::World => Self::World,
        }
    }
}
