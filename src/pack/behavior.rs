// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::archive::ArchiveSink;
use crate::error::{BotResult, FsError, PackError};
use crate::structure::{Identifier, LOWEST_GAME_VERSION, McExtension, Structure};

use super::manifest::{Manifest, ManifestHeader, ManifestMetadata, ManifestModule, ModuleType};
use super::{GENERATOR_NAME, PACK_ICON, PackContext, StructureMetadata};

const MANIFEST: &str = "manifest.json";
const METADATA: &str = "metadata.json";
const STRUCTURES_DIR: &str = "structures";

/// A raw `.mcstructure` and the identifier it will be loaded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureFile {
    pub identifier: Identifier,
    pub bytes: Vec<u8>,
}

impl StructureFile {
    /// Read a file, deriving the identifier from its name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a valid identifier or the file
    /// cannot be read.
    pub fn from_path(path: &Path) -> BotResult<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| FsError::NotFound(path.display().to_string()))?;
        let identifier = Identifier::from_filename(&name)?;
        let bytes = std::fs::read(path).map_err(|e| FsError::io(path, e))?;
        Ok(Self { identifier, bytes })
    }
}

/// Parsed structure ready to be packed.
#[derive(Debug, Clone)]
pub(super) struct PackedStructure {
    pub(super) file: StructureFile,
    pub(super) metadata: StructureMetadata,
}

/// Behavior pack holding structures.
#[derive(Debug, Clone)]
pub struct Behavior {
    pack_name: String,
    pub(super) manifest: Manifest,
    pub(super) structures: Vec<PackedStructure>,
    icon: Option<Vec<u8>>,
}

impl Behavior {
    /// Parse every structure and build the manifest.
    ///
    /// The pack is named after the first structure.
    ///
    /// # Errors
    ///
    /// Returns an error if `files` is empty, has duplicate identifiers, or a
    /// structure fails to parse.
    pub fn new(files: Vec<StructureFile>, ctx: &PackContext<'_>) -> BotResult<Self> {
        let Some(first) = files.first() else {
            return Err(PackError::Empty.into());
        };
        let pack_name = first.identifier.file_name();

        let mut seen = BTreeSet::new();
        let mut structures = Vec::with_capacity(files.len());
        for file in files {
            if !seen.insert(file.identifier.clone()) {
                return Err(PackError::Duplicate(file.identifier.to_string()).into());
            }
            let structure = Structure::parse(&file.bytes)?;
            let metadata = StructureMetadata::new(file.identifier.clone(), &structure);
            tracing::debug!(
                identifier = %file.identifier,
                blocks = structure.block_count(),
                min_engine = %metadata.min_engine_version,
                "Parsed structure"
            );
            structures.push(PackedStructure { file, metadata });
        }

        let identifiers: Vec<String> = structures
            .iter()
            .map(|s| s.metadata.identifier.to_string())
            .collect();
        let min_engine_version = structures
            .iter()
            .map(|s| s.metadata.min_engine_version.clone())
            .max()
            .unwrap_or(LOWEST_GAME_VERSION);

        let header = ManifestHeader::builder()
            .pack_type(ModuleType::Data)
            .name(format!("Structures: {pack_name}"))
            .description(format!(
                "Structures: {}\n*Generated with {GENERATOR_NAME}",
                identifiers.join(", ")
            ))
            .min_engine_version(min_engine_version)
            .build()?;
        let metadata = ManifestMetadata::builder()
            .generated_with(BTreeMap::from([(
                GENERATOR_NAME.to_string(),
                vec![ctx.generator_version.clone()],
            )]))
            .build()?;
        let manifest = Manifest::builder()
            .header(header)
            .modules(vec![
                ManifestModule::builder()
                    .module_type(ModuleType::Data)
                    .build()?,
            ])
            .metadata(metadata)
            .build()?;

        Ok(Self {
            pack_name,
            manifest,
            structures,
            icon: ctx.resources.pack_icon.clone(),
        })
    }

    #[must_use]
    pub fn pack_name(&self) -> &str {
        &self.pack_name
    }

    #[must_use]
    pub const fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Entries of `metadata.json`, in pack order.
    pub fn metadata(&self) -> impl Iterator<Item = &StructureMetadata> {
        self.structures.iter().map(|s| &s.metadata)
    }

    /// `<pack_name>.mcpack`.
    #[must_use]
    pub fn file_name(&self) -> String {
        McExtension::McPack.append_to(&self.pack_name)
    }

    /// Write the pack contents relative to the sink root.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the sink fails.
    pub fn write_to(&self, sink: &mut dyn ArchiveSink) -> BotResult<()> {
        sink.add_file(MANIFEST, self.manifest.to_json()?.as_bytes())?;
        if let Some(icon) = &self.icon {
            sink.add_file(PACK_ICON, icon)?;
        }
        let metadata: Vec<StructureMetadata> = self.metadata().cloned().collect();
        sink.add_file(
            METADATA,
            StructureMetadata::list_to_json(&metadata)?.as_bytes(),
        )?;
        for structure in &self.structures {
            let path = structure
                .file
                .identifier
                .to_path(McExtension::McStructure.as_str());
            sink.add_file(&format!("{STRUCTURES_DIR}/{path}"), &structure.file.bytes)?;
        }
        Ok(())
    }
}
