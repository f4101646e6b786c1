// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Offline conversion command arguments.
//!
//! ```text
//! convert --type world -o out/ a.mcstructure b.mcstructure
//! inspect a.mcstructure
//! level-versions import flat.mcworld
//! level-versions show
//! ```

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::pack::TargetType;

/// Arguments for the `convert` command.
#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    /// Output kind: behavior, single-behavior or world.
    #[arg(
        short = 't',
        long = "type",
        value_name = "TYPE",
        default_value = "behavior",
        value_parser = clap::value_parser!(TargetType)
    )]
    pub target: TargetType,

    /// Directory to write into. Defaults to the working directory.
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Write directories instead of zipped archives.
    #[arg(long)]
    pub unpacked: bool,

    /// `.mcstructure` files. Their names become the structure identifiers.
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,
}

/// Arguments for the `inspect` command.
#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// `.mcstructure` files to describe.
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,
}

/// Arguments for the `level-versions` command.
#[derive(Debug, Clone, Args)]
pub struct LevelVersionsArgs {
    #[command(subcommand)]
    pub subcommand: LevelVersionsSubcommand,
}

/// Level versions subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum LevelVersionsSubcommand {
    /// Reads level.dat of an exported flat world and stores its versions.
    Import {
        /// Exported `.mcworld` file.
        #[arg(value_name = "WORLD")]
        world: PathBuf,
    },

    /// Prints the stored versions.
    Show,
}
