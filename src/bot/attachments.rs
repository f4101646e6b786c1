// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Converting Discord attachments.
//!
//! ```text
//! attachments --filter .mcstructure--> download into temp/<random>/<n>/<filename>
//!     --> StructureFile --> TargetType::convert --> CreateAttachment
//! ```

use std::path::Path;

use poise::serenity_prelude as serenity;

use super::Data;
use super::data_request::DataRequest;
use crate::error::{BotError, BotResult, FsError, PackError, Result};
use crate::logging::LogReason;
use crate::net::Downloader;
use crate::pack::{LEVEL_VERSIONS_DOCUMENT, LevelVersions, PackContext, StructureFile, TargetType, crate_version};
use crate::structure::McExtension;

/// Attachments named `*.mcstructure`.
#[must_use]
pub fn structure_attachments(attachments: &[serenity::Attachment]) -> Vec<&serenity::Attachment> {
    attachments
        .iter()
        .filter(|attachment| McExtension::McStructure.matches(&attachment.filename))
        .collect()
}

/// Last path component of an uploaded file name.
///
/// # Errors
///
/// Returns [`FsError::UnsafePath`] for names without one, such as `..`.
pub fn sanitize_filename(filename: &str) -> BotResult<&str> {
    Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| FsError::UnsafePath(filename.to_string()).into())
}

async fn download_structures(
    attachments: &[&serenity::Attachment],
    temp_root: &Path,
) -> Result<Vec<StructureFile>> {
    tokio::fs::create_dir_all(temp_root)
        .await
        .map_err(|e| FsError::io(temp_root, e))?;
    let dir = tempfile::tempdir_in(temp_root).map_err(|e| FsError::io(temp_root, e))?;

    let mut files = Vec::with_capacity(attachments.len());
    for (index, attachment) in attachments.iter().enumerate() {
        // one directory per file keeps equal names apart
        let path = dir
            .path()
            .join(index.to_string())
            .join(sanitize_filename(&attachment.filename)?);
        Downloader::new()
            .url(&attachment.url)
            .file(&path)
            .silent()
            .download()
            .await?;
        files.push(StructureFile::from_path(&path)?);
    }
    Ok(files)
}

/// Download and convert `attachments` into files ready to upload.
///
/// A world without stored level versions asks the admin for them.
///
/// # Errors
///
/// Returns an error if a download fails, a structure is invalid, or level
/// versions are missing for a world.
pub async fn convert_attachments(
    data: &Data,
    target: TargetType,
    attachments: &[&serenity::Attachment],
) -> Result<Vec<serenity::CreateAttachment>> {
    let level_versions = if target == TargetType::World {
        let stored = data
            .store
            .get::<LevelVersions>(LEVEL_VERSIONS_DOCUMENT)
            .await?;
        if stored.is_none() {
            data.notifier.data_request(DataRequest::ExportedFlatWorld).await;
            return Err(BotError::from(PackError::MissingLevelVersions).into());
        }
        stored
    } else {
        None
    };

    let files = download_structures(attachments, &data.config.paths.temp_dir()).await?;
    let version = crate_version();
    let ctx = PackContext {
        resources: &data.resources,
        level_versions: level_versions.as_ref(),
        generator_version: &version,
    };
    let generated = target.convert(files, &ctx)?;

    tracing::debug!(
        reason = %LogReason::Convert,
        target = target.as_str(),
        inputs = attachments.len(),
        outputs = generated.len(),
        "Converted attachments"
    );
    Ok(generated
        .into_iter()
        .map(|file| serenity::CreateAttachment::bytes(file.bytes, file.filename))
        .collect())
}
