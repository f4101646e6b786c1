// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |        run / convert / level-versions
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  TOML + env, layered      |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!               bot       translate   store
//!          poise/serenity   DeepL    documents
//!                 |                 forum/local
//!        +--------+--------+
//!        v                 v
//!     package           settings
//!   (channel mode)     (per guild)
//!
//!   +-----------------------------------------+
//!   |  conversion   pack, structure, nbt      |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, net, zip  |
//!   +-----------------------------------------+
//! ```

pub mod archive;
pub mod bot;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod nbt;
pub mod net;
pub mod pack;
pub mod package;
pub mod settings;
pub mod store;
pub mod structure;
pub mod translate;
