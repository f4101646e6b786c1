// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Void flat world with every structure placed on a grid.
//!
//! ```text
//! n = 5, per_row = ceil(sqrt 5) = 3, edge = -(3/2)*spacing
//!
//!        z →
//!  x   [0] [1] [2]
//!  ↓   [3] [4]
//! ```
//!
//! A tick function loads all structures once on first entry; each structure
//! also gets `reload/<identifier>.mcfunction`.

use semver::Version;

use crate::archive::{ArchiveSink, Prefixed};
use crate::error::{BotResult, PackError, StructureError};
use crate::structure::{Coordinate, McExtension, file_stem};

use super::behavior::{Behavior, PackedStructure, StructureFile};
use super::level::generate_level_dat;
use super::{PackContext, TickFunctions, WORLD_ICON, WorldPackReference};

/// `execute` got its current syntax in this release; the first load
/// function relies on it.
pub const NEW_EXECUTE_MIN_ENGINE_VERSION: Version = Version::new(1, 19, 50);

const STRUCTURES_GAP: u32 = 3;
const STRUCTURES_Y: i32 = 0;

const LEVEL_DAT: &str = "level.dat";
const WORLD_BEHAVIOR_PACKS: &str = "world_behavior_packs.json";
const BEHAVIOR_PACKS_DIR: &str = "behavior_packs";
const FUNCTIONS_DIR: &str = "functions";
const TICK: &str = "tick.json";
const FIRST_LOAD: &str = "internal/first_load.mcfunction";
const RELOAD_ALL: &str = "reload_all_structures.mcfunction";
const RELOAD_DIR: &str = "reload";

/// A generated `.mcworld`.
#[derive(Debug, Clone)]
pub struct World {
    world_name: String,
    behavior: Behavior,
    level_dat: Vec<u8>,
    icon: Option<Vec<u8>>,
    first_load_function: String,
}

impl World {
    /// # Errors
    ///
    /// Returns [`PackError::MissingLevelVersions`] when no level versions are
    /// known, or any error from building the behavior pack.
    pub fn new(files: Vec<StructureFile>, ctx: &PackContext<'_>) -> BotResult<Self> {
        let versions = ctx
            .level_versions
            .ok_or(PackError::MissingLevelVersions)?;

        let mut behavior = Behavior::new(files, ctx)?;
        behavior
            .manifest
            .header_mut()
            .raise_min_engine_version(&NEW_EXECUTE_MIN_ENGINE_VERSION);
        place_structures(&mut behavior.structures)?;

        let world_name = behavior.pack_name().to_string();
        let level_dat = generate_level_dat(
            &ctx.resources.template_level,
            &format!("Structures: {world_name}"),
            versions,
            chrono::Utc::now().timestamp(),
        )?;

        Ok(Self {
            world_name,
            behavior,
            level_dat,
            icon: ctx.resources.world_icon.clone(),
            first_load_function: ctx.resources.first_load_function.clone(),
        })
    }

    #[must_use]
    pub fn world_name(&self) -> &str {
        &self.world_name
    }

    #[must_use]
    pub const fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// `<world_name>.mcworld`.
    #[must_use]
    pub fn file_name(&self) -> String {
        McExtension::McWorld.append_to(&self.world_name)
    }

    /// `function reload/<path>` lines, in placement order.
    #[must_use]
    pub fn reload_all_function(&self) -> String {
        self.behavior
            .structures
            .iter()
            .map(|s| format!("function {RELOAD_DIR}/{}", reload_stem(s)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write the world contents relative to the sink root.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the sink fails.
    pub fn write_to(&self, sink: &mut dyn ArchiveSink) -> BotResult<()> {
        sink.add_file(LEVEL_DAT, &self.level_dat)?;
        if let Some(icon) = &self.icon {
            sink.add_file(WORLD_ICON, icon)?;
        }
        let packs = [WorldPackReference::from_manifest(self.behavior.manifest())];
        sink.add_file(
            WORLD_BEHAVIOR_PACKS,
            WorldPackReference::list_to_json(&packs)?.as_bytes(),
        )?;

        let mut pack = Prefixed::new(
            sink,
            &format!("{BEHAVIOR_PACKS_DIR}/{}", self.behavior.pack_name()),
        );
        self.behavior.write_to(&mut pack)?;

        let mut functions = Prefixed::new(&mut pack, FUNCTIONS_DIR);
        functions.add_file(TICK, TickFunctions::new([FIRST_LOAD])?.to_json()?.as_bytes())?;
        functions.add_file(FIRST_LOAD, self.first_load_function.as_bytes())?;
        functions.add_file(RELOAD_ALL, self.reload_all_function().as_bytes())?;
        for structure in &self.behavior.structures {
            let Some(coordinate) = structure.metadata.coordinate else {
                continue;
            };
            let command = format!(
                "structure load {} {} {} {}",
                structure.metadata.identifier, coordinate.x, coordinate.y, coordinate.z
            );
            let path = structure
                .metadata
                .identifier
                .to_path(McExtension::McFunction.as_str());
            functions.add_file(&format!("{RELOAD_DIR}/{path}"), command.as_bytes())?;
        }
        Ok(())
    }
}

fn reload_stem(structure: &PackedStructure) -> String {
    let path = structure
        .metadata
        .identifier
        .to_path(McExtension::McFunction.as_str());
    file_stem(&path).to_string()
}

/// Smallest `r` with `r * r >= n`.
fn per_row(n: usize) -> usize {
    let mut r = n.isqrt();
    if r * r < n {
        r += 1;
    }
    r
}

/// Sort by identifier and assign grid coordinates.
fn place_structures(structures: &mut [PackedStructure]) -> Result<(), StructureError> {
    structures.sort_by(|a, b| a.metadata.identifier.cmp(&b.metadata.identifier));

    let largest = structures
        .iter()
        .flat_map(|s| [s.metadata.size.x, s.metadata.size.z])
        .max()
        .unwrap_or(0);
    let too_large = || StructureError::InvalidSize(format!("{largest} is too large to place"));
    let spacing = largest
        .checked_add(STRUCTURES_GAP)
        .and_then(|s| i32::try_from(s).ok())
        .ok_or_else(too_large)?;

    let per_row = per_row(structures.len()).max(1);
    let half = i32::try_from(per_row / 2).map_err(|_| too_large())?;
    let edge = half.checked_mul(-spacing).ok_or_else(too_large)?;

    for (i, structure) in structures.iter_mut().enumerate() {
        let (row, column) = (i / per_row, i % per_row);
        let offset = |index: usize| {
            i32::try_from(index)
                .ok()
                .and_then(|index| index.checked_mul(spacing))
                .and_then(|delta| edge.checked_add(delta))
        };
        let (Some(x), Some(z)) = (offset(row), offset(column)) else {
            return Err(too_large());
        };
        structure.metadata.coordinate = Some(Coordinate::new(x, STRUCTURES_Y, z));
    }
    Ok(())
}
