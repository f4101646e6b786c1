// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Serde helpers for manifest versions.
//!
//! ```text
//! 1.19.50        <-> [1, 19, 50]
//! 1.0.0-beta.1   <-> "1.0.0-beta.1"
//! ```

use semver::Version;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Array(Vec<u64>),
    Text(String),
}

fn from_repr<E: serde::de::Error>(repr: Repr) -> Result<Version, E> {
    let text = match repr {
        Repr::Array(parts) => parts
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join("."),
        Repr::Text(text) => text,
    };
    Version::parse(&text).map_err(|e| E::custom(format!("invalid version '{text}': {e}")))
}

/// `true` when the version can be written as `[major, minor, patch]`.
#[must_use]
pub fn is_plain(version: &Version) -> bool {
    version.pre.is_empty() && version.build.is_empty()
}

pub fn serialize<S: Serializer>(version: &Version, serializer: S) -> Result<S::Ok, S::Error> {
    if is_plain(version) {
        [version.major, version.minor, version.patch].serialize(serializer)
    } else {
        serializer.collect_str(version)
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Version, D::Error> {
    from_repr(Repr::deserialize(deserializer)?)
}

/// Same encoding for optional fields.
pub mod option {
    use semver::Version;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Repr;

    pub fn serialize<S: Serializer>(
        version: &Option<Version>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match version {
            Some(version) => super::serialize(version, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Version>, D::Error> {
        Option::<Repr>::deserialize(deserializer)?
            .map(super::from_repr)
            .transpose()
    }
}

/// Always an int array, used by `world_behavior_packs.json`.
pub mod array {
    use semver::Version;
    use serde::{Serialize, Serializer};

    pub fn serialize<S: Serializer>(version: &Version, serializer: S) -> Result<S::Ok, S::Error> {
        [version.major, version.minor, version.patch].serialize(serializer)
    }
}
