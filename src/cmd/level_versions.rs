// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Level versions import and display.

use std::path::Path;

use crate::archive;
use crate::cli::convert::{LevelVersionsArgs, LevelVersionsSubcommand};
use crate::config::Config;
use crate::error::{FsError, Result};
use crate::logging::LogReason;
use crate::pack::{LEVEL_VERSIONS_DOCUMENT, LevelVersions};
use crate::store::DocumentStore;

use super::open_local_store;

const LEVEL_DAT: &str = "level.dat";

/// Dispatch `level-versions import|show` against the local store.
///
/// # Errors
///
/// See [`import_level_versions`] and [`show_level_versions`].
pub async fn run_level_versions_command(args: &LevelVersionsArgs, config: &Config) -> Result<()> {
    let store = open_local_store(config);
    match &args.subcommand {
        LevelVersionsSubcommand::Import { world } => {
            let versions = import_level_versions(&store, world).await?;
            println!("{}", serde_json::to_string_pretty(&versions)?);
        }
        LevelVersionsSubcommand::Show => {
            println!("{}", show_level_versions(&store).await?);
        }
    }
    Ok(())
}

/// Read `level.dat` from an exported world and store its versions.
///
/// # Errors
///
/// Returns an error if the world cannot be read, has no `level.dat`, the
/// versions are invalid, or the store cannot be written.
pub async fn import_level_versions(store: &DocumentStore, world: &Path) -> Result<LevelVersions> {
    let bytes = tokio::fs::read(world)
        .await
        .map_err(|e| FsError::io(world, e))?;
    let level_dat = archive::extract_entry(&bytes, LEVEL_DAT)?;
    let versions = LevelVersions::from_level_dat(&level_dat)?;

    store.put(LEVEL_VERSIONS_DOCUMENT, &versions).await?;
    store.flush().await?;
    tracing::info!(
        reason = %LogReason::Store,
        world = %world.display(),
        "Imported level versions"
    );
    Ok(versions)
}

/// Pretty JSON of the stored versions.
///
/// # Errors
///
/// Returns an error if no versions are stored or the store fails.
pub async fn show_level_versions(store: &DocumentStore) -> Result<String> {
    let Some(versions) = store
        .get::<LevelVersions>(LEVEL_VERSIONS_DOCUMENT)
        .await?
    else {
        anyhow::bail!("no level versions stored, run `level-versions import` first");
    };
    Ok(serde_json::to_string_pretty(&versions)?)
}
