// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Offline conversion and inspection.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::convert::{ConvertArgs, InspectArgs};
use crate::config::Config;
use crate::error::{BotResult, FsError, Result};
use crate::logging::LogReason;
use crate::net::unique_path;
use crate::pack::{
    LEVEL_VERSIONS_DOCUMENT, LevelVersions, PackContext, PackResources, StructureFile, TargetType,
    crate_version,
};
use crate::structure::{Identifier, Size, Structure};

use super::open_local_store;

/// Convert `args.files` and write the results below the output directory.
///
/// Returns the written paths in output order.
///
/// # Errors
///
/// Returns an error if an input is unreadable or invalid, a world is requested
/// without stored level versions, or an output cannot be written.
pub async fn run_convert_command(args: &ConvertArgs, config: &Config) -> Result<Vec<PathBuf>> {
    let resources = PackResources::load(config.paths.resources.as_deref())?;
    let level_versions = if args.target == TargetType::World {
        open_local_store(config)
            .get::<LevelVersions>(LEVEL_VERSIONS_DOCUMENT)
            .await?
    } else {
        None
    };

    let files = args
        .files
        .iter()
        .map(|path| StructureFile::from_path(path))
        .collect::<BotResult<Vec<_>>>()?;

    let out_dir = args.output.clone().unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir).map_err(|e| FsError::io(&out_dir, e))?;

    let version = crate_version();
    let ctx = PackContext {
        resources: &resources,
        level_versions: level_versions.as_ref(),
        generator_version: &version,
    };

    let written = if args.unpacked {
        args.target.convert_unpacked(files, &ctx, &out_dir)?
    } else {
        write_generated(args.target, files, &ctx, &out_dir)?
    };

    for path in &written {
        tracing::info!(
            reason = %LogReason::Convert,
            path = %path.display(),
            "Wrote output"
        );
        println!("{}", path.display());
    }
    Ok(written)
}

fn write_generated(
    target: TargetType,
    files: Vec<StructureFile>,
    ctx: &PackContext<'_>,
    out_dir: &Path,
) -> BotResult<Vec<PathBuf>> {
    let mut written = Vec::new();
    for generated in target.convert(files, ctx)? {
        let path = unique_path(out_dir, &generated.filename);
        std::fs::write(&path, &generated.bytes).map_err(|e| FsError::io(&path, e))?;
        written.push(path);
    }
    Ok(written)
}

/// What `inspect` prints for one structure.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureReport {
    pub identifier: Identifier,
    pub size: Size,
    pub min_engine_version: String,
    pub palette_size: usize,
    pub block_count: usize,
    pub entity_count: usize,
}

impl StructureReport {
    /// # Errors
    ///
    /// Returns an error if the name is not an identifier or the file is not a
    /// valid structure.
    pub fn from_path(path: &Path) -> BotResult<Self> {
        let file = StructureFile::from_path(path)?;
        let structure = Structure::parse(&file.bytes)?;
        Ok(Self {
            identifier: file.identifier,
            size: structure.size(),
            min_engine_version: structure.min_engine_version().to_string(),
            palette_size: structure.palette().len(),
            block_count: structure.block_count(),
            entity_count: structure.entities().len(),
        })
    }
}

/// Print a pretty JSON array with one report per file.
///
/// # Errors
///
/// Returns an error if any file cannot be inspected.
pub fn run_inspect_command(args: &InspectArgs) -> Result<()> {
    let reports = args
        .files
        .iter()
        .map(|path| StructureReport::from_path(path))
        .collect::<BotResult<Vec<_>>>()?;
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
