// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;

/// File extensions used by Minecraft Bedrock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum McExtension {
    McAddon,
    McFunction,
    McPack,
    McPerf,
    McShortcut,
    McStructure,
    McTemplate,
    McWorld,
    Nbt,
    Dat,
}

impl McExtension {
    pub const ALL: [Self; 10] = [
        Self::McAddon,
        Self::McFunction,
        Self::McPack,
        Self::McPerf,
        Self::McShortcut,
        Self::McStructure,
        Self::McTemplate,
        Self::McWorld,
        Self::Nbt,
        Self::Dat,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::McAddon => "mcaddon",
            Self::McFunction => "mcfunction",
            Self::McPack => "mcpack",
            Self::McPerf => "mcperf",
            Self::McShortcut => "mcshortcut",
            Self::McStructure => "mcstructure",
            Self::McTemplate => "mctemplate",
            Self::McWorld => "mcworld",
            Self::Nbt => "nbt",
            Self::Dat => "dat",
        }
    }

    /// Whether `filename` ends with `.<ext>`, ignoring ASCII case.
    #[must_use]
    pub fn matches(self, filename: &str) -> bool {
        filename
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(self.as_str()))
    }

    /// `name.<ext>`.
    #[must_use]
    pub fn append_to(self, name: &str) -> String {
        format!("{name}.{}", self.as_str())
    }
}

impl fmt::Display for McExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for McExtension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ext| ext.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown extension '{s}'"))
    }
}
