// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Bedrock little-endian NBT.
//!
//! ```text
//! .mcstructure / level.dat payload
//!   [id:u8][name_len:u16][name][payload]   <- root, always Compound
//!
//! payloads (all little-endian)
//!   Byte i8 | Short i16 | Int i32 | Long i64 | Float f32 | Double f64
//!   String     u16 len + utf-8
//!   List       elem id:u8 + i32 len + payloads
//!   Compound   named tags ... End(0)
//!   *Array     i32 len + elements
//!
//! level.dat
//!   [storage_version:i32][payload_len:i32][root tag]
//! ```

mod reader;
mod writer;

#[cfg(test)]
mod tests;

use crate::error::NbtError;

pub use reader::{read_level_dat, read_root};
pub use writer::{write_level_dat, write_root};

/// Result type for NBT operations.
pub type NbtResult<T> = std::result::Result<T, NbtError>;

/// Maximum compound/list nesting accepted by the reader.
pub const MAX_DEPTH: usize = 512;

/// Tag type ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagType {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagType {
    /// Decode a tag id.
    ///
    /// # Errors
    ///
    /// Returns [`NbtError::UnknownTag`] for ids above 12.
    pub const fn from_id(id: u8) -> NbtResult<Self> {
        Ok(match id {
            0 => Self::End,
            1 => Self::Byte,
            2 => Self::Short,
            3 => Self::Int,
            4 => Self::Long,
            5 => Self::Float,
            6 => Self::Double,
            7 => Self::ByteArray,
            8 => Self::String,
            9 => Self::List,
            10 => Self::Compound,
            11 => Self::IntArray,
            12 => Self::LongArray,
            other => return Err(NbtError::UnknownTag(other)),
        })
    }

    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::End => "End",
            Self::Byte => "Byte",
            Self::Short => "Short",
            Self::Int => "Int",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::ByteArray => "ByteArray",
            Self::String => "String",
            Self::List => "List",
            Self::Compound => "Compound",
            Self::IntArray => "IntArray",
            Self::LongArray => "LongArray",
        }
    }
}

/// A single NBT value.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    #[must_use]
    pub const fn tag_type(&self) -> TagType {
        match self {
            Self::Byte(_) => TagType::Byte,
            Self::Short(_) => TagType::Short,
            Self::Int(_) => TagType::Int,
            Self::Long(_) => TagType::Long,
            Self::Float(_) => TagType::Float,
            Self::Double(_) => TagType::Double,
            Self::ByteArray(_) => TagType::ByteArray,
            Self::String(_) => TagType::String,
            Self::List(_) => TagType::List,
            Self::Compound(_) => TagType::Compound,
            Self::IntArray(_) => TagType::IntArray,
            Self::LongArray(_) => TagType::LongArray,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_compound(&self) -> Option<&Compound> {
        match self {
            Self::Compound(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_list(&self) -> Option<&List> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i32> for Tag {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for Tag {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Compound> for Tag {
    fn from(value: Compound) -> Self {
        Self::Compound(value)
    }
}

impl From<List> for Tag {
    fn from(value: List) -> Self {
        Self::List(value)
    }
}

/// Homogeneous list of unnamed tags.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    element: TagType,
    values: Vec<Tag>,
}

impl Default for List {
    fn default() -> Self {
        Self::empty(TagType::End)
    }
}

impl List {
    /// Create a list, checking that every value has the element type.
    ///
    /// # Errors
    ///
    /// Returns [`NbtError::MixedList`] if a value has another type.
    pub fn new(element: TagType, values: Vec<Tag>) -> NbtResult<Self> {
        if let Some(bad) = values.iter().find(|v| v.tag_type() != element) {
            return Err(NbtError::MixedList {
                expected: element.name(),
                found: bad.tag_type().name(),
            });
        }
        Ok(Self { element, values })
    }

    #[must_use]
    pub const fn empty(element: TagType) -> Self {
        Self {
            element,
            values: Vec::new(),
        }
    }

    /// Build a list of `Int` tags.
    pub fn of_ints(values: impl IntoIterator<Item = i32>) -> Self {
        Self {
            element: TagType::Int,
            values: values.into_iter().map(Tag::Int).collect(),
        }
    }

    /// Build a list of `Compound` tags.
    pub fn of_compounds(values: impl IntoIterator<Item = Compound>) -> Self {
        Self {
            element: TagType::Compound,
            values: values.into_iter().map(Tag::Compound).collect(),
        }
    }

    #[must_use]
    pub const fn element(&self) -> TagType {
        self.element
    }

    #[must_use]
    pub fn values(&self) -> &[Tag] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values as ints. `name` is used in the error.
    ///
    /// # Errors
    ///
    /// Returns [`NbtError::WrongType`] unless the list holds ints (or is empty).
    pub fn ints(&self, name: &str) -> NbtResult<Vec<i32>> {
        self.values
            .iter()
            .map(|v| v.as_int().ok_or_else(|| wrong_type(name, TagType::Int, v)))
            .collect()
    }

    /// Values as compounds. `name` is used in the error.
    ///
    /// # Errors
    ///
    /// Returns [`NbtError::WrongType`] unless the list holds compounds (or is empty).
    pub fn compounds(&self, name: &str) -> NbtResult<Vec<&Compound>> {
        self.values
            .iter()
            .map(|v| {
                v.as_compound()
                    .ok_or_else(|| wrong_type(name, TagType::Compound, v))
            })
            .collect()
    }

    /// Values as nested lists. `name` is used in the error.
    ///
    /// # Errors
    ///
    /// Returns [`NbtError::WrongType`] unless the list holds lists (or is empty).
    pub fn lists(&self, name: &str) -> NbtResult<Vec<&Self>> {
        self.values
            .iter()
            .map(|v| v.as_list().ok_or_else(|| wrong_type(name, TagType::List, v)))
            .collect()
    }
}

fn wrong_type(name: &str, expected: TagType, found: &Tag) -> NbtError {
    NbtError::WrongType {
        name: name.to_string(),
        expected: expected.name(),
        found: found.tag_type().name(),
    }
}

/// Named tags in file order.
///
/// Bedrock does not care about order, but keeping it makes rewritten
/// `level.dat` files diff cleanly against the template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    entries: Vec<(String, Tag)>,
}

impl Compound {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace a tag. A replaced tag keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, tag: impl Into<Tag>) {
        let name = name.into();
        let tag = tag.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = tag;
        } else {
            self.entries.push((name, tag));
        }
    }

    /// Builder-style [`Compound::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, tag: impl Into<Tag>) -> Self {
        self.insert(name, tag);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Tag> {
        let pos = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(pos).1)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), t))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get a tag or fail with [`NbtError::MissingTag`].
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is absent.
    pub fn require(&self, name: &str) -> NbtResult<&Tag> {
        self.get(name)
            .ok_or_else(|| NbtError::MissingTag(name.to_string()))
    }

    /// # Errors
    ///
    /// Returns an error if the tag is absent or not an `Int`.
    pub fn get_int(&self, name: &str) -> NbtResult<i32> {
        let tag = self.require(name)?;
        tag.as_int()
            .ok_or_else(|| wrong_type(name, TagType::Int, tag))
    }

    /// # Errors
    ///
    /// Returns an error if the tag is absent or not a `String`.
    pub fn get_string(&self, name: &str) -> NbtResult<&str> {
        let tag = self.require(name)?;
        tag.as_str()
            .ok_or_else(|| wrong_type(name, TagType::String, tag))
    }

    /// # Errors
    ///
    /// Returns an error if the tag is absent or not a `Compound`.
    pub fn get_compound(&self, name: &str) -> NbtResult<&Self> {
        let tag = self.require(name)?;
        tag.as_compound()
            .ok_or_else(|| wrong_type(name, TagType::Compound, tag))
    }

    /// # Errors
    ///
    /// Returns an error if the tag is absent or not a `List`.
    pub fn get_list(&self, name: &str) -> NbtResult<&List> {
        let tag = self.require(name)?;
        tag.as_list()
            .ok_or_else(|| wrong_type(name, TagType::List, tag))
    }

    /// Like [`Compound::get_compound`] but absent is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag exists with another type.
    pub fn opt_compound(&self, name: &str) -> NbtResult<Option<&Self>> {
        self.get(name)
            .map(|tag| {
                tag.as_compound()
                    .ok_or_else(|| wrong_type(name, TagType::Compound, tag))
            })
            .transpose()
    }

    /// Like [`Compound::get_list`] but absent is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag exists with another type.
    pub fn opt_list(&self, name: &str) -> NbtResult<Option<&List>> {
        self.get(name)
            .map(|tag| {
                tag.as_list()
                    .ok_or_else(|| wrong_type(name, TagType::List, tag))
            })
            .transpose()
    }
}
