// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Structure identifiers as used by `/structure load`.
//!
//! ```text
//! "house"              -> mystructure:house    -> structures/house.mcstructure
//! "castle:towers/west" -> castle:towers/west   -> structures/castle/towers/west.mcstructure
//! "mystructure:a/b"    -> rejected (default namespace takes one path element)
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::StructureError;

/// Namespace the game assigns to structures saved without one.
pub const DEFAULT_NAMESPACE: &str = "mystructure";

pub(crate) static IDENTIFIER_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^(?:[^:/]+:)?(?:[^:/]+/)*[^:/]+$"));

/// `namespace:path/elements`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    namespace: String,
    path: Vec<String>,
}

impl Identifier {
    /// Identifier from an uploaded filename, dropping the last extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the remaining stem is not a valid identifier.
    pub fn from_filename(filename: &str) -> Result<Self, StructureError> {
        file_stem(filename).parse()
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    #[must_use]
    pub fn is_default_namespace(&self) -> bool {
        self.namespace == DEFAULT_NAMESPACE
    }

    /// `ns:path` for custom namespaces, bare `path` for the default one.
    #[must_use]
    pub fn to_string_without_default_namespace(&self) -> String {
        if self.is_default_namespace() {
            self.path.join("/")
        } else {
            self.to_string()
        }
    }

    /// Relative file path with the given extension, `/`-separated.
    #[must_use]
    pub fn to_path(&self, extension: &str) -> String {
        if self.is_default_namespace() {
            format!("{}.{extension}", self.path.join("/"))
        } else {
            format!("{}/{}.{extension}", self.namespace, self.path.join("/"))
        }
    }

    /// A single filesystem-safe name, used for pack and world names.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.to_string_without_default_namespace()
            .replace([':', '/'], "_")
    }
}

impl FromStr for Identifier {
    type Err = StructureError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let error = |message: &str| StructureError::Identifier {
            value: value.to_string(),
            message: message.to_string(),
        };
        let pattern = IDENTIFIER_PATTERN
            .as_ref()
            .map_err(|e| StructureError::Pattern(e.clone()))?;
        if !pattern.is_match(value) {
            return Err(error("expected [namespace:]path"));
        }
        let (namespace, path) = value.split_once(':').unwrap_or((DEFAULT_NAMESPACE, value));
        let path: Vec<String> = path.split('/').map(str::to_string).collect();
        if namespace == DEFAULT_NAMESPACE && path.len() != 1 {
            return Err(error(
                "Use of an explicit \"mystructure\" directory is restricted.",
            ));
        }
        Ok(Self {
            namespace: namespace.to_string(),
            path,
        })
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path.join("/"))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl serde::Serialize for Identifier {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Identifier {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Name without its last extension. Names without a dot are returned as is.
#[must_use]
pub fn file_stem(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}
