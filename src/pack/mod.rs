// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Behavior pack and world generation.
//!
//! ```text
//!  [(Identifier, path)]
//!        │ parse each .mcstructure
//!        ▼
//!    Behavior ── manifest.json, metadata.json, pack_icon.png, structures/…
//!        │ (world only) raise engine to 1.19.50, lay structures out on a grid
//!        ▼
//!     World ──── level.dat, world_behavior_packs.json, behavior_packs/<pack>/…
//!        │          + functions/ (tick.json, reload/*.mcfunction)
//!        ▼
//!  ArchiveSink ─ .mcpack / .mcworld zip, or a directory
//! ```

mod behavior;
pub mod level;
pub mod manifest;
mod metadata;
mod target;
mod world;

#[cfg(test)]
mod tests;

use std::path::Path;

use crate::error::{BotResult, FsError};
use crate::nbt::Compound;

pub use behavior::{Behavior, StructureFile};
pub use level::{FlatWorldLayers, FlatWorldLayersVersions, LEVEL_VERSIONS_DOCUMENT, LevelVersions};
pub use metadata::{StructureMetadata, TickFunctions, WorldPackReference};
pub use target::{Artifact, GeneratedFile, TargetType};
pub use world::{NEW_EXECUTE_MIN_ENGINE_VERSION, World};

/// Tool name written to manifests and descriptions.
pub const GENERATOR_NAME: &str = "Erutcurts";

const PACK_ICON: &str = "pack_icon.png";
const WORLD_ICON: &str = "world_icon.jpeg";
const FIRST_LOAD_FUNCTION: &str = "first_load_function.mcfunction";
const TEMPLATE_LEVEL: &str = "template_level.dat";

const BUILTIN_FIRST_LOAD: &str = include_str!("../../resources/first_load_function.mcfunction");

/// Optional assets copied into generated packs.
#[derive(Debug, Clone)]
pub struct PackResources {
    pub pack_icon: Option<Vec<u8>>,
    pub world_icon: Option<Vec<u8>>,
    pub first_load_function: String,
    pub template_level: Compound,
}

impl Default for PackResources {
    fn default() -> Self {
        Self {
            pack_icon: None,
            world_icon: None,
            first_load_function: BUILTIN_FIRST_LOAD.to_string(),
            template_level: level::builtin_template(),
        }
    }
}

impl PackResources {
    /// Load assets from `dir`, falling back to built-ins for missing files.
    ///
    /// Recognised files: `pack_icon.png`, `world_icon.jpeg`,
    /// `first_load_function.mcfunction`, `template_level.dat`.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be read or the template is
    /// not a valid `level.dat`.
    pub fn load(dir: Option<&Path>) -> BotResult<Self> {
        let mut resources = Self::default();
        let Some(dir) = dir else {
            return Ok(resources);
        };

        resources.pack_icon = read_optional(&dir.join(PACK_ICON))?;
        resources.world_icon = read_optional(&dir.join(WORLD_ICON))?;
        if let Some(bytes) = read_optional(&dir.join(FIRST_LOAD_FUNCTION))? {
            resources.first_load_function = String::from_utf8_lossy(&bytes).into_owned();
        }
        if let Some(bytes) = read_optional(&dir.join(TEMPLATE_LEVEL))? {
            resources.template_level = level::read_template(&bytes)?;
        }
        tracing::debug!(dir = %dir.display(), "Loaded pack resources");
        Ok(resources)
    }
}

fn read_optional(path: &Path) -> BotResult<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(FsError::io(path, e).into()),
    }
}

/// Inputs shared by every conversion.
#[derive(Debug, Clone, Copy)]
pub struct PackContext<'a> {
    pub resources: &'a PackResources,
    /// Required for worlds only.
    pub level_versions: Option<&'a LevelVersions>,
    /// Crate version recorded in `generated_with`.
    pub generator_version: &'a semver::Version,
}

/// This crate's version as a semver.
#[must_use]
pub fn crate_version() -> semver::Version {
    semver::Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or_else(|_| semver::Version::new(0, 0, 0))
}
