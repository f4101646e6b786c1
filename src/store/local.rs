// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{BotResult, FsError};

use super::{DocumentBackend, check_document_name};

/// Documents as `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    dir: PathBuf,
}

impl LocalBackend {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> BotResult<PathBuf> {
        check_document_name(name)?;
        Ok(self.dir.join(format!("{name}.json")))
    }
}

#[async_trait]
impl DocumentBackend for LocalBackend {
    async fn load(&self, name: &str) -> BotResult<Option<String>> {
        let path = self.path(name)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FsError::io(&path, e).into()),
        }
    }

    async fn save(&self, name: &str, json: &str) -> BotResult<()> {
        let path = self.path(name)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| FsError::io(&self.dir, e))?;

        // rename keeps readers from seeing a half-written document
        let partial = path.with_extension("json.partial");
        tokio::fs::write(&partial, json)
            .await
            .map_err(|e| FsError::io(&partial, e))?;
        tokio::fs::rename(&partial, &path)
            .await
            .map_err(|e| FsError::io(&path, e))?;
        Ok(())
    }
}
