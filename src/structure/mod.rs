// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! `.mcstructure` model.
//!
//! ```text
//! root
//!  |- format_version          Int
//!  |- size                    List<Int>[3]
//!  |- structure_world_origin  List<Int>[3]
//!  '- structure
//!      |- block_indices       List<List<Int>>[2]   primary ++ secondary
//!      |- entities            List<Compound>
//!      '- palette.default
//!          |- block_palette        List<{name, states, version}>
//!          '- block_position_data  {"<flat index>": {block_entity_data, tick_queue_data}}
//!
//! flat index of (x, y, z) = x*Y*Z + y*Z + z
//! secondary layer        = flat index + volume
//! palette index -1       = void (structure void)
//! ```
//!
//! Layout follows tryashtar's "Bedrock mcstructure file format" notes.

mod extension;
mod identifier;

#[cfg(test)]
pub(crate) mod fixtures;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use semver::Version;

use crate::error::{BotResult, FsError, StructureError};
use crate::nbt::{self, Compound};

pub use extension::McExtension;
pub use identifier::{DEFAULT_NAMESPACE, Identifier, file_stem};

/// Oldest engine version a generated pack may declare.
pub const LOWEST_GAME_VERSION: Version = Version::new(1, 13, 0);

/// Structure dimensions. Every axis is positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Size {
    /// # Errors
    ///
    /// Returns [`StructureError::InvalidSize`] if any axis is not positive.
    pub fn new(x: i32, y: i32, z: i32) -> Result<Self, StructureError> {
        let axis = |v: i32| {
            u32::try_from(v)
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(|| StructureError::InvalidSize(format!("[{x}, {y}, {z}]")))
        };
        Ok(Self {
            x: axis(x)?,
            y: axis(y)?,
            z: axis(z)?,
        })
    }

    /// # Errors
    ///
    /// Returns an error unless `values` holds exactly three positive ints.
    pub fn from_slice(values: &[i32]) -> Result<Self, StructureError> {
        match values {
            [x, y, z] => Self::new(*x, *y, *z),
            other => Err(StructureError::InvalidSize(format!("{other:?}"))),
        }
    }

    /// Number of block positions, or `None` on overflow.
    #[must_use]
    pub fn volume(&self) -> Option<usize> {
        let x = usize::try_from(self.x).ok()?;
        let y = usize::try_from(self.y).ok()?;
        let z = usize::try_from(self.z).ok()?;
        x.checked_mul(y)?.checked_mul(z)
    }

    /// Flat index of a position, `None` when out of bounds.
    #[must_use]
    pub fn flat_index(&self, x: u32, y: u32, z: u32) -> Option<usize> {
        if x >= self.x || y >= self.y || z >= self.z {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        let (sy, sz) = (self.y as usize, self.z as usize);
        Some(x * sy * sz + y * sz + z)
    }
}

/// Position in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coordinate {
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// # Errors
    ///
    /// Returns an error unless `values` holds exactly three ints.
    pub fn from_slice(values: &[i32]) -> Result<Self, StructureError> {
        match values {
            [x, y, z] => Ok(Self::new(*x, *y, *z)),
            other => Err(StructureError::InvalidCoordinate(format!("{other:?}"))),
        }
    }
}

/// Palette entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    name: String,
    states: Compound,
    version: [u8; 4],
}

impl Block {
    /// # Errors
    ///
    /// Returns [`StructureError::InvalidBlock`] if the name is blank.
    pub fn new(
        name: impl Into<String>,
        states: Compound,
        version: i32,
    ) -> Result<Self, StructureError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StructureError::InvalidBlock("blank block name".to_string()));
        }
        Ok(Self {
            name,
            states,
            version: version.to_be_bytes(),
        })
    }

    fn from_nbt(tag: &Compound) -> BotResult<Self> {
        Ok(Self::new(
            tag.get_string("name")?,
            tag.get_compound("states")?.clone(),
            tag.get_int("version")?,
        )?)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn states(&self) -> &Compound {
        &self.states
    }

    /// Version as `a.b.c.d`, one component per big-endian byte.
    #[must_use]
    pub fn version(&self) -> String {
        let [a, b, c, d] = self.version;
        format!("{a}.{b}.{c}.{d}")
    }

    /// Engine version that introduced this block state format: the version
    /// with its last component dropped.
    #[must_use]
    pub fn engine_version(&self) -> Version {
        let [a, b, c, _] = self.version;
        Version::new(u64::from(a), u64::from(b), u64::from(c))
    }
}

/// Extra data attached to one flat position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionData {
    pub block_entity_data: Option<Compound>,
    pub tick_delays: Vec<u32>,
}

impl PositionData {
    fn from_nbt(tag: &Compound) -> BotResult<Self> {
        let block_entity_data = tag.opt_compound("block_entity_data")?.cloned();
        let mut tick_delays = Vec::new();
        if let Some(queue) = tag.opt_list("tick_queue_data")? {
            for entry in queue.compounds("tick_queue_data")? {
                if entry.get("tick_delay").is_none() {
                    continue;
                }
                let delay = entry.get_int("tick_delay")?;
                let delay = u32::try_from(delay).map_err(|_| {
                    StructureError::InvalidBlock(format!("negative tick delay {delay}"))
                })?;
                tick_delays.push(delay);
            }
        }
        Ok(Self {
            block_entity_data,
            tick_delays,
        })
    }
}

/// Both layers of one position. `None` is structure void.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layers<'a> {
    pub primary: Option<&'a Block>,
    pub secondary: Option<&'a Block>,
    pub data: Option<&'a PositionData>,
}

impl Layers<'_> {
    /// A position is void when both layers are.
    #[must_use]
    pub const fn is_void(&self) -> bool {
        self.primary.is_none() && self.secondary.is_none()
    }
}

/// Parsed `.mcstructure`.
#[derive(Debug, Clone)]
pub struct Structure {
    format_version: i32,
    size: Size,
    palette: Vec<Block>,
    // primary layer followed by secondary layer, palette indices
    indices: Vec<Option<u32>>,
    position_data: BTreeMap<usize, PositionData>,
    entities: Vec<Compound>,
    world_origin: Coordinate,
}

impl Structure {
    /// Read and parse a structure file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid structure.
    pub fn from_path(path: impl AsRef<Path>) -> BotResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| FsError::io(path, e))?;
        Self::parse(&bytes)
    }

    /// Parse structure bytes.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid NBT, missing tags, a block index count that
    /// does not match the size, or palette indices out of range.
    pub fn parse(bytes: &[u8]) -> BotResult<Self> {
        let (_, root) = nbt::read_root(bytes)?;
        Self::from_nbt(&root)
    }

    fn from_nbt(root: &Compound) -> BotResult<Self> {
        let format_version = root.get_int("format_version")?;
        if format_version <= 0 {
            return Err(StructureError::InvalidFormatVersion(format_version).into());
        }

        let size = Size::from_slice(&root.get_list("size")?.ints("size")?)?;
        let world_origin = Coordinate::from_slice(
            &root
                .get_list("structure_world_origin")?
                .ints("structure_world_origin")?,
        )?;

        let structure = root.get_compound("structure")?;
        let default_palette = structure
            .get_compound("palette")
            .and_then(|p| p.get_compound("default"))?;

        let palette = match default_palette.opt_list("block_palette")? {
            Some(list) => list
                .compounds("block_palette")?
                .into_iter()
                .map(Block::from_nbt)
                .collect::<BotResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        let mut indices = Vec::new();
        let layers = structure.get_list("block_indices")?;
        for layer in layers.lists("block_indices")? {
            for index in layer.ints("block_indices")? {
                indices.push(palette_index(index, palette.len())?);
            }
        }

        let volume = size
            .volume()
            .ok_or_else(|| StructureError::InvalidSize(format!("{size:?} overflows")))?;
        if indices.len() != volume * 2 {
            return Err(StructureError::IndexCount {
                expected: volume * 2,
                found: indices.len(),
            }
            .into());
        }

        let mut position_data = BTreeMap::new();
        if let Some(data) = default_palette.opt_compound("block_position_data")? {
            for (key, tag) in data.iter() {
                let Ok(index) = key.parse::<usize>() else {
                    continue;
                };
                let Some(entry) = tag.as_compound() else {
                    continue;
                };
                position_data.insert(index, PositionData::from_nbt(entry)?);
            }
        }

        let entities = match structure.opt_list("entities")? {
            Some(list) => list
                .compounds("entities")?
                .into_iter()
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        Ok(Self {
            format_version,
            size,
            palette,
            indices,
            position_data,
            entities,
            world_origin,
        })
    }

    #[must_use]
    pub const fn format_version(&self) -> i32 {
        self.format_version
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub const fn world_origin(&self) -> Coordinate {
        self.world_origin
    }

    #[must_use]
    pub fn palette(&self) -> &[Block] {
        &self.palette
    }

    #[must_use]
    pub fn entities(&self) -> &[Compound] {
        &self.entities
    }

    fn volume(&self) -> usize {
        self.indices.len() / 2
    }

    fn block(&self, flat: usize) -> Option<&Block> {
        self.indices[flat].map(|i| &self.palette[i as usize])
    }

    /// Both layers at a position, `None` when out of bounds.
    #[must_use]
    pub fn layers(&self, x: u32, y: u32, z: u32) -> Option<Layers<'_>> {
        let flat = self.size.flat_index(x, y, z)?;
        Some(Layers {
            primary: self.block(flat),
            secondary: self.block(flat + self.volume()),
            data: self.position_data.get(&flat),
        })
    }

    /// Number of positions with a block in either layer.
    #[must_use]
    pub fn block_count(&self) -> usize {
        let volume = self.volume();
        (0..volume)
            .filter(|&flat| self.indices[flat].is_some() || self.indices[flat + volume].is_some())
            .count()
    }

    /// Lowest engine version able to load every block in the structure.
    ///
    /// Falls back to [`LOWEST_GAME_VERSION`] when every position is void.
    #[must_use]
    pub fn min_engine_version(&self) -> Version {
        let used: BTreeSet<u32> = self.indices.iter().flatten().copied().collect();
        used.into_iter()
            .map(|i| self.palette[i as usize].engine_version())
            .max()
            .unwrap_or(LOWEST_GAME_VERSION)
    }
}

fn palette_index(index: i32, len: usize) -> Result<Option<u32>, StructureError> {
    if index == -1 {
        return Ok(None);
    }
    u32::try_from(index)
        .ok()
        .filter(|i| (*i as usize) < len)
        .map(Some)
        .ok_or(StructureError::PaletteIndex { index, len })
}
