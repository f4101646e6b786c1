// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

use super::{Compound, List, NbtResult, Tag, TagType};
use crate::error::NbtError;

/// Encode a named root compound.
///
/// # Errors
///
/// Returns [`NbtError::InvalidLength`] if a string or array is too long for
/// its length prefix.
pub fn write_root(name: &str, root: &Compound) -> NbtResult<Vec<u8>> {
    let mut out = Vec::new();
    out.push(TagType::Compound.id());
    string(&mut out, name)?;
    compound(&mut out, root)?;
    Ok(out)
}

/// Encode a `level.dat` with its 8-byte header.
///
/// # Errors
///
/// Returns an error if the payload cannot be encoded.
pub fn write_level_dat(storage_version: i32, root: &Compound) -> NbtResult<Vec<u8>> {
    let payload = write_root("", root)?;
    let len = i32::try_from(payload.len())
        .map_err(|_| NbtError::InvalidLength(i64::try_from(payload.len()).unwrap_or(i64::MAX)))?;
    let mut out = Vec::with_capacity(payload.len() + 8);
    out.extend_from_slice(&storage_version.to_le_bytes());
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

fn length(out: &mut Vec<u8>, len: usize) -> NbtResult<()> {
    let len = i32::try_from(len)
        .map_err(|_| NbtError::InvalidLength(i64::try_from(len).unwrap_or(i64::MAX)))?;
    out.extend_from_slice(&len.to_le_bytes());
    Ok(())
}

fn string(out: &mut Vec<u8>, value: &str) -> NbtResult<()> {
    let len = u16::try_from(value.len())
        .map_err(|_| NbtError::InvalidLength(i64::try_from(value.len()).unwrap_or(i64::MAX)))?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(value.as_bytes());
    Ok(())
}

fn compound(out: &mut Vec<u8>, value: &Compound) -> NbtResult<()> {
    for (name, tag) in value.iter() {
        out.push(tag.tag_type().id());
        string(out, name)?;
        payload(out, tag)?;
    }
    out.push(TagType::End.id());
    Ok(())
}

fn list(out: &mut Vec<u8>, value: &List) -> NbtResult<()> {
    out.push(value.element().id());
    length(out, value.len())?;
    for tag in value.values() {
        payload(out, tag)?;
    }
    Ok(())
}

fn payload(out: &mut Vec<u8>, tag: &Tag) -> NbtResult<()> {
    match tag {
        Tag::Byte(v) => out.extend_from_slice(&v.to_le_bytes()),
        Tag::Short(v) => out.extend_from_slice(&v.to_le_bytes()),
        Tag::Int(v) => out.extend_from_slice(&v.to_le_bytes()),
        Tag::Long(v) => out.extend_from_slice(&v.to_le_bytes()),
        Tag::Float(v) => out.extend_from_slice(&v.to_le_bytes()),
        Tag::Double(v) => out.extend_from_slice(&v.to_le_bytes()),
        Tag::ByteArray(values) => {
            length(out, values.len())?;
            out.extend(values.iter().map(|b| b.cast_unsigned()));
        }
        Tag::String(v) => string(out, v)?,
        Tag::List(v) => list(out, v)?,
        Tag::Compound(v) => compound(out, v)?,
        Tag::IntArray(values) => {
            length(out, values.len())?;
            for v in values {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        Tag::LongArray(values) => {
            length(out, values.len())?;
            for v in values {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
    }
    Ok(())
}
