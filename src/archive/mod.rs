// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Output sinks for generated packs and worlds.
//!
//! ```text
//!   Behavior / World ──write_to──▶ dyn ArchiveSink
//!                                    ├── ZipSink   in-memory deflate zip (.mcpack / .mcworld)
//!                                    └── DirSink   plain directory (--unpacked)
//! ```
//!
//! Entry paths are `/`-separated and relative to the archive root.

#[cfg(test)]
mod tests;

use std::io::{Cursor, Read, Write};
use std::path::{Component, Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{BotResult, FsError};

/// Destination for generated files.
pub trait ArchiveSink {
    /// Add one file at `path`, relative to the sink root.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is unsafe or the write fails.
    fn add_file(&mut self, path: &str, bytes: &[u8]) -> BotResult<()>;
}

/// In-memory zip archive.
pub struct ZipSink {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl ZipSink {
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// Finish the archive and return its bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the central directory cannot be written.
    pub fn finish(self) -> BotResult<Vec<u8>> {
        let cursor = self.writer.finish().map_err(FsError::Zip)?;
        Ok(cursor.into_inner())
    }
}

impl Default for ZipSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveSink for ZipSink {
    fn add_file(&mut self, path: &str, bytes: &[u8]) -> BotResult<()> {
        check_entry_path(path)?;
        self.writer
            .start_file(path, self.options)
            .map_err(FsError::Zip)?;
        self.writer
            .write_all(bytes)
            .map_err(|e| FsError::io(path, e))?;
        Ok(())
    }
}

/// Writes entries below a directory, creating parents as needed.
#[derive(Debug, Clone)]
pub struct DirSink {
    root: PathBuf,
}

impl DirSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArchiveSink for DirSink {
    fn add_file(&mut self, path: &str, bytes: &[u8]) -> BotResult<()> {
        check_entry_path(path)?;
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| FsError::io(parent, e))?;
        }
        std::fs::write(&target, bytes).map_err(|e| FsError::io(&target, e))?;
        Ok(())
    }
}

/// Adds every entry under `prefix/` of the wrapped sink.
pub struct Prefixed<'a> {
    inner: &'a mut dyn ArchiveSink,
    prefix: String,
}

impl<'a> Prefixed<'a> {
    pub fn new(inner: &'a mut dyn ArchiveSink, prefix: &str) -> Self {
        Self {
            inner,
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }
}

impl ArchiveSink for Prefixed<'_> {
    fn add_file(&mut self, path: &str, bytes: &[u8]) -> BotResult<()> {
        self.inner
            .add_file(&format!("{}/{path}", self.prefix), bytes)
    }
}

/// Reject empty, absolute and parent-escaping entry paths.
///
/// # Errors
///
/// Returns [`FsError::UnsafePath`] for such paths.
pub fn check_entry_path(path: &str) -> Result<(), FsError> {
    let unsafe_path = || FsError::UnsafePath(path.to_string());
    if path.is_empty() || path.starts_with('/') || path.contains('\\') {
        return Err(unsafe_path());
    }
    let parsed = Path::new(path);
    if parsed.is_absolute() {
        return Err(unsafe_path());
    }
    for component in parsed.components() {
        if !matches!(component, Component::Normal(_) | Component::CurDir) {
            return Err(unsafe_path());
        }
    }
    Ok(())
}

/// Read one entry of a zip archive held in memory.
///
/// Matches `name` exactly first, then any entry whose last path component
/// is `name` (exported worlds sometimes carry a top-level directory).
///
/// # Errors
///
/// Returns [`FsError::NotFound`] when no entry matches, or a zip error.
pub fn extract_entry(archive: &[u8], name: &str) -> BotResult<Vec<u8>> {
    let mut zip = ZipArchive::new(Cursor::new(archive)).map_err(FsError::Zip)?;
    let index = zip.index_for_name(name).or_else(|| {
        zip.file_names()
            .filter(|entry| entry.rsplit('/').next() == Some(name))
            .min_by_key(|entry| entry.len())
            .and_then(|entry| zip.index_for_name(entry))
    });
    let Some(index) = index else {
        return Err(FsError::NotFound(name.to_string()).into());
    };
    let mut entry = zip.by_index(index).map_err(FsError::Zip)?;
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| FsError::io(name, e))?;
    Ok(bytes)
}

/// Names of all file entries, in archive order.
///
/// # Errors
///
/// Returns an error if the bytes are not a zip archive.
pub fn entry_names(archive: &[u8]) -> BotResult<Vec<String>> {
    let zip = ZipArchive::new(Cursor::new(archive)).map_err(FsError::Zip)?;
    Ok(zip
        .file_names()
        .filter(|name| !name.ends_with('/'))
        .map(str::to_string)
        .collect())
}
