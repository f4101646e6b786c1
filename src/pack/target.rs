// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::archive::{ArchiveSink, DirSink, ZipSink};
use crate::error::BotResult;

use super::behavior::{Behavior, StructureFile};
use super::world::World;
use super::PackContext;

/// What to convert uploaded structures into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// All structures in one `.mcpack`.
    Behavior,
    /// One `.mcpack` per structure.
    SingleBehavior,
    /// All structures in one `.mcworld`.
    World,
}

impl TargetType {
    pub const ALL: [Self; 3] = [Self::Behavior, Self::SingleBehavior, Self::World];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Behavior => "behavior",
            Self::SingleBehavior => "single-behavior",
            Self::World => "world",
        }
    }

    /// Whether all inputs end up in a single output.
    #[must_use]
    pub const fn is_multiple_files(self) -> bool {
        !matches!(self, Self::SingleBehavior)
    }

    /// Build the packs or worlds for `files`.
    ///
    /// # Errors
    ///
    /// Returns an error if any structure is invalid, identifiers repeat, or
    /// a world is requested without level versions.
    pub fn build(self, files: Vec<StructureFile>, ctx: &PackContext<'_>) -> BotResult<Vec<Artifact>> {
        match self {
            Self::Behavior => Ok(vec![Artifact::Behavior(Behavior::new(files, ctx)?)]),
            Self::World => Ok(vec![Artifact::World(World::new(files, ctx)?)]),
            Self::SingleBehavior => files
                .into_iter()
                .map(|file| Behavior::new(vec![file], ctx).map(Artifact::Behavior))
                .collect(),
        }
    }

    /// Convert into zipped `.mcpack` / `.mcworld` files.
    ///
    /// # Errors
    ///
    /// See [`TargetType::build`].
    pub fn convert(self, files: Vec<StructureFile>, ctx: &PackContext<'_>) -> BotResult<Vec<GeneratedFile>> {
        let artifacts = self.build(files, ctx)?;
        tracing::info!(target_type = %self, outputs = artifacts.len(), "Converted structures");
        artifacts.iter().map(Artifact::to_zip).collect()
    }

    /// Convert into directories below `out_dir`, one per output.
    ///
    /// # Errors
    ///
    /// See [`TargetType::build`]; also fails if a directory cannot be written.
    pub fn convert_unpacked(
        self,
        files: Vec<StructureFile>,
        ctx: &PackContext<'_>,
        out_dir: &Path,
    ) -> BotResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        for artifact in self.build(files, ctx)? {
            let root = crate::net::unique_path(out_dir, artifact.name());
            let mut sink = DirSink::new(&root);
            artifact.write_to(&mut sink)?;
            written.push(root);
        }
        Ok(written)
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|t| t.as_str()).collect();
                format!("unknown type '{s}', expected one of: {}", names.join(", "))
            })
    }
}

/// Archive bytes and the name to upload them under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A built pack or world.
#[derive(Debug, Clone)]
pub enum Artifact {
    Behavior(Behavior),
    World(World),
}

impl Artifact {
    /// Base name without extension.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Behavior(behavior) => behavior.pack_name(),
            Self::World(world) => world.world_name(),
        }
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        match self {
            Self::Behavior(behavior) => behavior.file_name(),
            Self::World(world) => world.file_name(),
        }
    }

    /// # Errors
    ///
    /// Returns an error if serialization or the sink fails.
    pub fn write_to(&self, sink: &mut dyn ArchiveSink) -> BotResult<()> {
        match self {
            Self::Behavior(behavior) => behavior.write_to(sink),
            Self::World(world) => world.write_to(sink),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the archive cannot be written.
    pub fn to_zip(&self) -> BotResult<GeneratedFile> {
        let mut sink = ZipSink::new();
        self.write_to(&mut sink)?;
        Ok(GeneratedFile {
            filename: self.file_name(),
            bytes: sink.finish()?,
        })
    }
}
