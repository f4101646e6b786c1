// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! `manifest.json` model.
//!
//! ```text
//! Manifest
//!  ├── format_version   always 2
//!  ├── header           name, uuid, version, engine/base game versions
//!  ├── modules[]        data | interface | script | resources | skin_pack | world_template
//!  ├── dependencies[]   uuid xor module_name
//!  ├── capabilities[]
//!  ├── metadata         authors, license, url, generated_with
//!  └── subpacks[]       never exactly one
//!
//! compatible module groups: {data, interface, script} {resources} {skin_pack} {world_template}
//! ```
//!
//! Every type validates itself when built and when read from JSON, so an
//! invalid manifest can never be written.

pub mod version;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet};

use semver::Version;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PackError;
use crate::structure::LOWEST_GAME_VERSION;

/// The only supported manifest format.
pub const FORMAT_VERSION: u32 = 2;

fn invalid(message: impl Into<String>) -> PackError {
    PackError::InvalidManifest(message.into())
}

fn ensure(condition: bool, message: &str) -> Result<(), PackError> {
    if condition { Ok(()) } else { Err(invalid(message)) }
}

/// Module type. Also decides the pack type of the header.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ModuleType {
    /// Behavior pack.
    #[default]
    Data,
    Interface,
    /// Resource pack.
    Resources,
    /// GameTest scripts.
    Script,
    SkinPack,
    WorldTemplate,
}

impl ModuleType {
    /// Module types that may share a manifest with this one.
    #[must_use]
    pub const fn compatible(self) -> &'static [Self] {
        match self {
            Self::Data | Self::Interface | Self::Script => &[Self::Data, Self::Interface, Self::Script],
            Self::Resources => &[Self::Resources],
            Self::SkinPack => &[Self::SkinPack],
            Self::WorldTemplate => &[Self::WorldTemplate],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackScope {
    Global,
    World,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestCapability {
    Chemistry,
    Raytraced,
    ScriptEval,
    #[serde(rename = "editorExtension")]
    EditorExtension,
}

/// Script module language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptLanguage {
    #[serde(rename = "JavaScript", alias = "javascript")]
    JavaScript,
}

impl ScriptLanguage {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::JavaScript => "js",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestHeader {
    #[serde(skip)]
    pack_type: ModuleType,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    uuid: Uuid,
    #[serde(with = "version")]
    version: Version,
    #[serde(default, with = "version::option", skip_serializing_if = "Option::is_none")]
    min_engine_version: Option<Version>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    platform_locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pack_scope: Option<PackScope>,
    #[serde(default, with = "version::option", skip_serializing_if = "Option::is_none")]
    base_game_version: Option<Version>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lock_template_options: Option<bool>,
}

#[bon::bon]
impl ManifestHeader {
    /// # Errors
    ///
    /// Returns [`PackError::InvalidManifest`] if the fields do not suit the pack type.
    #[builder]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pack_type: ModuleType,
        #[builder(into)] name: String,
        #[builder(into)] description: Option<String>,
        #[builder(default = Uuid::new_v4())] uuid: Uuid,
        #[builder(default = Version::new(1, 0, 0))] version: Version,
        min_engine_version: Option<Version>,
        platform_locked: Option<bool>,
        pack_scope: Option<PackScope>,
        base_game_version: Option<Version>,
        lock_template_options: Option<bool>,
    ) -> Result<Self, PackError> {
        let header = Self {
            pack_type,
            name,
            description,
            uuid,
            version,
            min_engine_version,
            platform_locked,
            pack_scope,
            base_game_version,
            lock_template_options,
        };
        header.validate()?;
        Ok(header)
    }
}

impl ManifestHeader {
    /// # Errors
    ///
    /// Returns [`PackError::InvalidManifest`] on the first violated rule.
    pub fn validate(&self) -> Result<(), PackError> {
        ensure(!self.name.trim().is_empty(), "header name must not be blank")?;
        match self.pack_type {
            ModuleType::Resources => {
                ensure(
                    self.min_engine_version.is_some(),
                    "resources header requires min_engine_version",
                )?;
                ensure(
                    self.base_game_version.is_none(),
                    "resources header must not set base_game_version",
                )?;
                ensure(
                    self.lock_template_options.is_none(),
                    "resources header must not set lock_template_options",
                )
            }
            ModuleType::Data | ModuleType::Interface | ModuleType::Script => {
                ensure(
                    self.min_engine_version
                        .as_ref()
                        .is_some_and(|v| *v >= LOWEST_GAME_VERSION),
                    "behavior header requires min_engine_version of at least 1.13.0",
                )?;
                ensure(
                    self.pack_scope.is_none(),
                    "behavior header must not set pack_scope",
                )?;
                ensure(
                    self.base_game_version.is_none(),
                    "behavior header must not set base_game_version",
                )?;
                ensure(
                    self.lock_template_options.is_none(),
                    "behavior header must not set lock_template_options",
                )
            }
            ModuleType::SkinPack => ensure(
                self.min_engine_version.is_none()
                    && self.platform_locked.is_none()
                    && self.pack_scope.is_none()
                    && self.base_game_version.is_none()
                    && self.lock_template_options.is_none(),
                "skin pack header only takes name, description, uuid and version",
            ),
            ModuleType::WorldTemplate => {
                ensure(
                    self.min_engine_version.is_none()
                        && self.platform_locked.is_none()
                        && self.pack_scope.is_none(),
                    "world template header must not set min_engine_version, platform_locked or pack_scope",
                )?;
                ensure(
                    self.base_game_version
                        .as_ref()
                        .is_some_and(|v| *v >= LOWEST_GAME_VERSION),
                    "world template header requires base_game_version of at least 1.13.0",
                )?;
                ensure(
                    self.lock_template_options.is_some(),
                    "world template header requires lock_template_options",
                )
            }
        }
    }

    #[must_use]
    pub const fn pack_type(&self) -> ModuleType {
        self.pack_type
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.uuid
    }

    #[must_use]
    pub const fn version(&self) -> &Version {
        &self.version
    }

    #[must_use]
    pub const fn min_engine_version(&self) -> Option<&Version> {
        self.min_engine_version.as_ref()
    }

    #[must_use]
    pub const fn base_game_version(&self) -> Option<&Version> {
        self.base_game_version.as_ref()
    }

    /// Raise `min_engine_version` to at least `floor`.
    pub(crate) fn raise_min_engine_version(&mut self, floor: &Version) {
        match &mut self.min_engine_version {
            Some(current) if *current >= *floor => {}
            slot => *slot = Some(floor.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestModule {
    #[serde(rename = "type")]
    module_type: ModuleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    uuid: Uuid,
    #[serde(with = "version")]
    version: Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<ScriptLanguage>,
}

#[bon::bon]
impl ManifestModule {
    /// # Errors
    ///
    /// Returns [`PackError::InvalidManifest`] if script fields are misused.
    #[builder]
    pub fn new(
        module_type: ModuleType,
        #[builder(into)] description: Option<String>,
        #[builder(default = Uuid::new_v4())] uuid: Uuid,
        #[builder(default = Version::new(1, 0, 0))] version: Version,
        #[builder(into)] entry: Option<String>,
        language: Option<ScriptLanguage>,
    ) -> Result<Self, PackError> {
        let module = Self {
            module_type,
            description,
            uuid,
            version,
            entry,
            language,
        };
        module.validate()?;
        Ok(module)
    }
}

impl ManifestModule {
    /// # Errors
    ///
    /// Script modules need an `entry` directly under `scripts/` with the
    /// language's extension. Other modules must not set either field.
    pub fn validate(&self) -> Result<(), PackError> {
        if self.module_type != ModuleType::Script {
            return ensure(
                self.entry.is_none() && self.language.is_none(),
                "only script modules take entry and language",
            );
        }
        let (Some(entry), Some(language)) = (&self.entry, self.language) else {
            return Err(invalid("script module requires entry and language"));
        };
        let file = entry.strip_prefix("scripts/").unwrap_or_default();
        ensure(
            !file.is_empty() && !file.contains('/'),
            "script entry must be directly under scripts/",
        )?;
        ensure(
            file.rsplit_once('.')
                .is_some_and(|(_, ext)| ext == language.extension()),
            "script entry extension does not match its language",
        )
    }

    #[must_use]
    pub const fn module_type(&self) -> ModuleType {
        self.module_type
    }

    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.uuid
    }

    #[must_use]
    pub const fn version(&self) -> &Version {
        &self.version
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDependency {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uuid: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    module_name: Option<String>,
    #[serde(with = "version")]
    version: Version,
}

#[bon::bon]
impl ManifestDependency {
    /// # Errors
    ///
    /// Exactly one of `uuid` and `module_name` must be set.
    #[builder]
    pub fn new(
        uuid: Option<Uuid>,
        #[builder(into)] module_name: Option<String>,
        version: Version,
    ) -> Result<Self, PackError> {
        let dependency = Self {
            uuid,
            module_name,
            version,
        };
        dependency.validate()?;
        Ok(dependency)
    }
}

impl ManifestDependency {
    /// Dependency on one module of another pack.
    #[must_use]
    pub fn from_module(module: &ManifestModule) -> Self {
        Self {
            uuid: Some(module.uuid),
            module_name: None,
            version: module.version.clone(),
        }
    }

    /// # Errors
    ///
    /// Returns [`PackError::InvalidManifest`] unless exactly one target is set.
    pub fn validate(&self) -> Result<(), PackError> {
        ensure(
            self.uuid.is_some() != self.module_name.is_some(),
            "dependency requires exactly one of uuid and module_name",
        )?;
        ensure(
            self.module_name
                .as_deref()
                .is_none_or(|name| !name.trim().is_empty()),
            "dependency module_name must not be blank",
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSubpack {
    folder_name: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    memory_tier: Option<i32>,
}

#[bon::bon]
impl ManifestSubpack {
    /// # Errors
    ///
    /// The folder must be a single path component, the name must not be
    /// blank and the memory tier must not be negative.
    #[builder]
    pub fn new(
        #[builder(into)] folder_name: String,
        #[builder(into)] name: String,
        memory_tier: Option<i32>,
    ) -> Result<Self, PackError> {
        let subpack = Self {
            folder_name,
            name,
            memory_tier,
        };
        subpack.validate()?;
        Ok(subpack)
    }
}

impl ManifestSubpack {
    /// # Errors
    ///
    /// Returns [`PackError::InvalidManifest`] on the first violated rule.
    pub fn validate(&self) -> Result<(), PackError> {
        let folder = self.folder_name.as_str();
        ensure(
            !folder.is_empty() && folder != "." && folder != ".." && !folder.contains(['/', '\\']),
            "subpack folder_name must be a single path component",
        )?;
        ensure(!self.name.trim().is_empty(), "subpack name must not be blank")?;
        ensure(
            self.memory_tier.is_none_or(|tier| tier >= 0),
            "subpack memory_tier must not be negative",
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    /// Tool name to the versions that touched the pack.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    generated_with: BTreeMap<String, Vec<Version>>,
}

#[bon::bon]
impl ManifestMetadata {
    /// # Errors
    ///
    /// Authors, license and tool names must not be blank; every tool needs
    /// at least one version; the url must parse.
    #[builder]
    pub fn new(
        #[builder(default)] authors: Vec<String>,
        #[builder(into)] license: Option<String>,
        #[builder(into)] url: Option<String>,
        #[builder(default)] generated_with: BTreeMap<String, Vec<Version>>,
    ) -> Result<Self, PackError> {
        let metadata = Self {
            authors,
            license,
            url,
            generated_with,
        };
        metadata.validate()?;
        Ok(metadata)
    }
}

impl ManifestMetadata {
    /// # Errors
    ///
    /// Returns [`PackError::InvalidManifest`] on the first violated rule.
    pub fn validate(&self) -> Result<(), PackError> {
        ensure(
            self.authors.iter().all(|a| !a.trim().is_empty()),
            "metadata authors must not be blank",
        )?;
        ensure(
            self.license.as_deref().is_none_or(|l| !l.trim().is_empty()),
            "metadata license must not be blank",
        )?;
        if let Some(url) = &self.url {
            reqwest::Url::parse(url).map_err(|e| invalid(format!("metadata url: {e}")))?;
        }
        ensure(
            self.generated_with
                .iter()
                .all(|(tool, versions)| !tool.trim().is_empty() && !versions.is_empty()),
            "generated_with needs a tool name and at least one version",
        )
    }

    #[must_use]
    pub const fn generated_with(&self) -> &BTreeMap<String, Vec<Version>> {
        &self.generated_with
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    format_version: u32,
    header: ManifestHeader,
    modules: Vec<ManifestModule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    dependencies: Vec<ManifestDependency>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    capabilities: BTreeSet<ManifestCapability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<ManifestMetadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    subpacks: Vec<ManifestSubpack>,
}

#[bon::bon]
impl Manifest {
    /// # Errors
    ///
    /// Returns [`PackError::InvalidManifest`] if the parts do not form a
    /// valid manifest.
    #[builder]
    pub fn new(
        #[builder(default = FORMAT_VERSION)] format_version: u32,
        header: ManifestHeader,
        modules: Vec<ManifestModule>,
        #[builder(default)] dependencies: Vec<ManifestDependency>,
        #[builder(default)] capabilities: BTreeSet<ManifestCapability>,
        metadata: Option<ManifestMetadata>,
        #[builder(default)] subpacks: Vec<ManifestSubpack>,
    ) -> Result<Self, PackError> {
        let manifest = Self {
            format_version,
            header,
            modules,
            dependencies,
            capabilities,
            metadata,
            subpacks,
        };
        manifest.validate()?;
        Ok(manifest)
    }
}

impl Manifest {
    /// Parse and validate `manifest.json`. The header's pack type is taken
    /// from the first module.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON or an invalid manifest.
    pub fn from_json(json: &str) -> Result<Self, PackError> {
        let mut manifest: Self = serde_json::from_str(json)?;
        manifest.header.pack_type = manifest
            .modules
            .first()
            .map(ManifestModule::module_type)
            .ok_or_else(|| invalid("manifest requires at least one module"))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, PackError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    ///
    /// Returns [`PackError::InvalidManifest`] on the first violated rule.
    pub fn validate(&self) -> Result<(), PackError> {
        if self.format_version != FORMAT_VERSION {
            return Err(invalid(format!(
                "format_version {} is not supported, only {FORMAT_VERSION}",
                self.format_version
            )));
        }
        ensure(!self.modules.is_empty(), "manifest requires at least one module")?;
        let types: BTreeSet<ModuleType> = self.modules.iter().map(|m| m.module_type).collect();
        for module_type in &types {
            if !types.iter().all(|t| module_type.compatible().contains(t)) {
                return Err(invalid(format!("incompatible module types: {types:?}")));
            }
        }
        ensure(
            types.contains(&self.header.pack_type),
            "header pack type does not match the modules",
        )?;

        self.header.validate()?;
        for module in &self.modules {
            module.validate()?;
        }
        for dependency in &self.dependencies {
            dependency.validate()?;
        }
        for subpack in &self.subpacks {
            subpack.validate()?;
        }
        if let Some(metadata) = &self.metadata {
            metadata.validate()?;
        }

        match self.header.pack_type {
            ModuleType::Data | ModuleType::Interface | ModuleType::Script => {
                ensure(self.subpacks.is_empty(), "behavior packs cannot have subpacks")?;
            }
            ModuleType::SkinPack | ModuleType::WorldTemplate => ensure(
                self.dependencies.is_empty()
                    && self.capabilities.is_empty()
                    && self.subpacks.is_empty(),
                "skin packs and world templates cannot have dependencies, capabilities or subpacks",
            )?,
            ModuleType::Resources => {}
        }
        ensure(
            self.subpacks.len() != 1,
            "a pack cannot have exactly one subpack",
        )
    }

    #[must_use]
    pub const fn header(&self) -> &ManifestHeader {
        &self.header
    }

    pub(crate) const fn header_mut(&mut self) -> &mut ManifestHeader {
        &mut self.header
    }

    #[must_use]
    pub fn modules(&self) -> &[ManifestModule] {
        &self.modules
    }

    #[must_use]
    pub fn dependencies(&self) -> &[ManifestDependency] {
        &self.dependencies
    }

    #[must_use]
    pub const fn capabilities(&self) -> &BTreeSet<ManifestCapability> {
        &self.capabilities
    }

    #[must_use]
    pub const fn metadata(&self) -> Option<&ManifestMetadata> {
        self.metadata.as_ref()
    }

    #[must_use]
    pub fn subpacks(&self) -> &[ManifestSubpack] {
        &self.subpacks
    }

    /// Dependencies on every module of this manifest.
    #[must_use]
    pub fn as_dependencies(&self) -> Vec<ManifestDependency> {
        self.modules
            .iter()
            .map(ManifestDependency::from_module)
            .collect()
    }
}
