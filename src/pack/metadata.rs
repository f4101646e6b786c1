// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Small JSON files written next to the manifest.

use semver::Version;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::manifest::{Manifest, version};
use crate::error::PackError;
use crate::structure::{Coordinate, Identifier, Size, Structure};

/// One entry of `metadata.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureMetadata {
    pub identifier: Identifier,
    pub min_engine_version: Version,
    pub size: Size,
    /// Load position, only set inside worlds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
}

impl StructureMetadata {
    #[must_use]
    pub fn new(identifier: Identifier, structure: &Structure) -> Self {
        Self {
            identifier,
            min_engine_version: structure.min_engine_version(),
            size: structure.size(),
            coordinate: None,
        }
    }

    /// Pretty JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn list_to_json(entries: &[Self]) -> Result<String, PackError> {
        Ok(serde_json::to_string_pretty(entries)?)
    }
}

/// Entry of `world_behavior_packs.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorldPackReference {
    pub pack_id: Uuid,
    #[serde(with = "version::array")]
    pub version: Version,
}

impl WorldPackReference {
    #[must_use]
    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self {
            pack_id: manifest.header().uuid(),
            version: manifest.header().version().clone(),
        }
    }

    /// Pretty JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn list_to_json(entries: &[Self]) -> Result<String, PackError> {
        Ok(serde_json::to_string_pretty(entries)?)
    }
}

/// `functions/tick.json`: functions run every tick, without extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickFunctions {
    pub values: Vec<String>,
}

impl TickFunctions {
    /// # Errors
    ///
    /// Each value must be a `.mcfunction` path.
    pub fn new<'a>(functions: impl IntoIterator<Item = &'a str>) -> Result<Self, PackError> {
        let values = functions
            .into_iter()
            .map(|path| {
                path.strip_suffix(".mcfunction")
                    .filter(|stem| !stem.is_empty())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        PackError::InvalidManifest(format!("tick function '{path}' is not an mcfunction"))
                    })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { values })
    }

    /// Pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, PackError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
