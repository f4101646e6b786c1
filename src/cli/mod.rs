// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! CLI module for erutcurts using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! erutcurts [global options] <command>
//! run
//! convert --type <behavior|single-behavior|world> [-o DIR] [--unpacked] FILES...
//! inspect FILES...
//! level-versions {import WORLD|show}
//! options
//! configs
//! version
//! ```

pub mod convert;
pub mod global;


use crate::cli::convert::{ConvertArgs, InspectArgs, LevelVersionsArgs};
use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// Minecraft Bedrock structure converter for Discord
#[derive(Debug, Parser)]
#[command(
    name = "erutcurts",
    author,
    version,
    about = "Minecraft Bedrock structure converter for Discord",
    long_about = "Erutcurts converts .mcstructure files into behavior packs (.mcpack)\n\
                  and void worlds (.mcworld).\n\n\
                  `erutcurts run` starts the Discord bot. `erutcurts convert` runs the\n\
                  same conversion offline. See `erutcurts <command> --help` for more\n\
                  information about a command.",
    after_help = "CONFIGURATION:\n\n\
                  erutcurts reads `erutcurts.toml` from the current directory, then\n\
                  every --config file in order. ERUTCURTS_<SECTION>_<KEY> variables and\n\
                  the plain names DISCORD_TOKEN, DEEPL_AUTH_KEY, ... override files.\n\
                  A `.env` file in the current directory is loaded first."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files in use.
    Configs,

    /// Starts the Discord bot.
    Run,

    /// Converts structure files into packs or worlds.
    Convert(ConvertArgs),

    /// Prints structure metadata as JSON.
    Inspect(InspectArgs),

    /// Manages the level versions used for worlds.
    #[command(name = "level-versions")]
    LevelVersions(LevelVersionsArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
