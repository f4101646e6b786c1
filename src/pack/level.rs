// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! `level.dat` generation.
//!
//! ```text
//! template (resources/template_level.dat or built-in)
//!   + LevelName, FlatWorldLayers, LastPlayed
//!   + LevelVersions (taken from a freshly exported flat world)
//!   = level.dat, header storage version = StorageVersion
//! ```
//!
//! The version tags change with every game release, so they are not
//! hardcoded but captured from a real world and kept in the document store.

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::{BotResult, NbtError, PackError};
use crate::nbt::{self, Compound, List, Tag};

/// Store document holding [`LevelVersions`].
pub const LEVEL_VERSIONS_DOCUMENT: &str = "LevelVersions";

const FLAT_WORLD_LAYERS: &str = "FlatWorldLayers";
const GENERATOR: &str = "Generator";
const MINIMUM_COMPATIBLE_CLIENT_VERSION: &str = "MinimumCompatibleClientVersion";
const WORLD_VERSION: &str = "WorldVersion";
const INVENTORY_VERSION: &str = "InventoryVersion";
const STORAGE_VERSION: &str = "StorageVersion";
const NETWORK_VERSION: &str = "NetworkVersion";

/// Plains.
const DEFAULT_BIOME_ID: i32 = 1;

/// Version part of the flat world generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatWorldLayersVersions {
    pub encoding_version: i32,
    pub world_version: String,
}

/// Release-dependent `level.dat` values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelVersions {
    pub generator: i32,
    /// Five components, so not a semver.
    pub minimum_compatible_client_version: Vec<i32>,
    pub world_version: i32,
    pub inventory_version: Version,
    pub storage_version: i32,
    pub network_version: i32,
    pub flat_world_layers: FlatWorldLayersVersions,
}

impl LevelVersions {
    /// Capture versions from an exported world's `level.dat` root.
    ///
    /// # Errors
    ///
    /// Returns an error if a tag is missing or the values are out of range.
    pub fn from_level(level: &Compound) -> BotResult<Self> {
        let layers = FlatWorldLayers::from_json(level.get_string(FLAT_WORLD_LAYERS)?)?;
        let inventory = level.get_string(INVENTORY_VERSION)?;
        let inventory_version = Version::parse(inventory).map_err(|e| {
            PackError::InvalidLevelVersions(format!("InventoryVersion '{inventory}': {e}"))
        })?;
        let versions = Self {
            generator: level.get_int(GENERATOR)?,
            minimum_compatible_client_version: level
                .get_list(MINIMUM_COMPATIBLE_CLIENT_VERSION)?
                .ints(MINIMUM_COMPATIBLE_CLIENT_VERSION)?,
            world_version: level.get_int(WORLD_VERSION)?,
            inventory_version,
            storage_version: level.get_int(STORAGE_VERSION)?,
            network_version: level.get_int(NETWORK_VERSION)?,
            flat_world_layers: FlatWorldLayersVersions {
                encoding_version: layers.encoding_version,
                world_version: layers.world_version,
            },
        };
        versions.validate()?;
        Ok(versions)
    }

    /// Capture versions from a complete `level.dat` file.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid NBT or invalid values.
    pub fn from_level_dat(bytes: &[u8]) -> BotResult<Self> {
        let (_, level) = nbt::read_level_dat(bytes)?;
        Self::from_level(&level)
    }

    /// # Errors
    ///
    /// Returns [`PackError::InvalidLevelVersions`] on the first violated rule.
    pub fn validate(&self) -> Result<(), PackError> {
        let check = |ok: bool, message: &str| {
            if ok {
                Ok(())
            } else {
                Err(PackError::InvalidLevelVersions(message.to_string()))
            }
        };
        check(self.generator > 0, "Generator must be positive")?;
        check(
            self.minimum_compatible_client_version.len() == 5
                && self.minimum_compatible_client_version.iter().all(|v| *v >= 0),
            "MinimumCompatibleClientVersion must be five non-negative numbers",
        )?;
        check(self.world_version > 0, "WorldVersion must be positive")?;
        check(self.storage_version > 0, "StorageVersion must be positive")?;
        check(self.network_version > 0, "NetworkVersion must be positive")?;
        check(
            self.flat_world_layers.encoding_version > 0,
            "FlatWorldLayers encoding_version must be positive",
        )?;
        check(
            !self.flat_world_layers.world_version.is_empty(),
            "FlatWorldLayers world_version must not be empty",
        )
    }

    /// Overwrite the version tags of `level`.
    pub fn apply(&self, level: &mut Compound) {
        level.insert(GENERATOR, self.generator);
        level.insert(
            MINIMUM_COMPATIBLE_CLIENT_VERSION,
            List::of_ints(self.minimum_compatible_client_version.iter().copied()),
        );
        level.insert(WORLD_VERSION, self.world_version);
        level.insert(INVENTORY_VERSION, self.inventory_version.to_string());
        level.insert(STORAGE_VERSION, self.storage_version);
        level.insert(NETWORK_VERSION, self.network_version);
    }

    /// Void flat world layers for this game version.
    #[must_use]
    pub fn void_layers(&self) -> FlatWorldLayers {
        FlatWorldLayers {
            block_layers: Vec::new(),
            biome_id: DEFAULT_BIOME_ID,
            structure_options: None,
            encoding_version: self.flat_world_layers.encoding_version,
            world_version: self.flat_world_layers.world_version.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockLayer {
    pub block_name: String,
    pub count: u32,
}

/// Flat world generator settings, stored as a JSON string tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatWorldLayers {
    pub block_layers: Vec<BlockLayer>,
    pub biome_id: i32,
    pub structure_options: Option<serde_json::Value>,
    pub encoding_version: i32,
    pub world_version: String,
}

impl FlatWorldLayers {
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe flat world layers.
    pub fn from_json(json: &str) -> Result<Self, PackError> {
        let layers: Self = serde_json::from_str(json)?;
        if layers.encoding_version <= 0 {
            return Err(PackError::InvalidLevelVersions(
                "FlatWorldLayers encoding_version must be positive".to_string(),
            ));
        }
        Ok(layers)
    }

    /// Compact JSON with nulls kept, as the game writes it.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, PackError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Build `level.dat` bytes for a generated world.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn generate_level_dat(
    template: &Compound,
    level_name: &str,
    versions: &LevelVersions,
    last_played: i64,
) -> BotResult<Vec<u8>> {
    let mut level = template.clone();
    level.insert("LevelName", level_name);
    level.insert(FLAT_WORLD_LAYERS, versions.void_layers().to_json()?);
    level.insert("LastPlayed", last_played);
    versions.apply(&mut level);
    Ok(nbt::write_level_dat(versions.storage_version, &level)?)
}

/// Read a template `level.dat`.
///
/// # Errors
///
/// Returns an error on invalid NBT.
pub fn read_template(bytes: &[u8]) -> Result<Compound, NbtError> {
    nbt::read_level_dat(bytes).map(|(_, level)| level)
}

/// Creative void flat world with cheats on and time, weather and mobs frozen.
#[must_use]
pub fn builtin_template() -> Compound {
    let byte = Tag::Byte;
    Compound::new()
        .with("LevelName", "Structures")
        .with("GameType", 1)
        .with("Difficulty", 0)
        .with(GENERATOR, 2)
        .with("Platform", 2)
        .with("RandomSeed", 0i64)
        .with("SpawnX", 0)
        .with("SpawnY", 32767)
        .with("SpawnZ", 0)
        .with("Time", 6000i64)
        .with("currentTick", 0i64)
        .with("LastPlayed", 0i64)
        .with("commandsEnabled", byte(1))
        .with("cheatsEnabled", byte(1))
        .with("hasBeenLoadedInCreative", byte(1))
        .with("educationFeaturesEnabled", byte(0))
        .with("showcoordinates", byte(1))
        .with("dodaylightcycle", byte(0))
        .with("doweathercycle", byte(0))
        .with("domobspawning", byte(0))
        .with("dofiretick", byte(0))
        .with("mobgriefing", byte(0))
        .with("keepinventory", byte(1))
        .with("spawnradius", 0)
        .with("experiments", Compound::new().with("experiments_ever_used", byte(0)))
}
