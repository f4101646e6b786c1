// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

use std::io::{Cursor, Read};

use super::{Compound, List, MAX_DEPTH, NbtResult, Tag, TagType};
use crate::error::NbtError;

/// Read a root compound and its name.
///
/// # Errors
///
/// Returns an error on truncated input, unknown tag ids, invalid strings,
/// or a root that is not a compound.
pub fn read_root(bytes: &[u8]) -> NbtResult<(String, Compound)> {
    let mut reader = Reader::new(Cursor::new(bytes));
    reader.root()
}

/// Read a `level.dat`: header followed by the root compound.
///
/// Returns the storage version from the header.
///
/// # Errors
///
/// Returns an error if the header is truncated, the declared length does not
/// match the remaining bytes, or the payload is invalid.
pub fn read_level_dat(bytes: &[u8]) -> NbtResult<(i32, Compound)> {
    let mut reader = Reader::new(Cursor::new(bytes));
    let version = reader.i32()?;
    let declared = reader.i32()?;
    let payload = &bytes[8..];
    if usize::try_from(declared).ok() != Some(payload.len()) {
        return Err(NbtError::HeaderLength {
            declared: i64::from(declared),
            actual: payload.len(),
        });
    }
    let (_, root) = read_root(payload)?;
    Ok((version, root))
}

struct Reader<R> {
    inner: R,
    depth: usize,
}

impl<R: Read> Reader<R> {
    const fn new(inner: R) -> Self {
        Self { inner, depth: 0 }
    }

    fn root(&mut self) -> NbtResult<(String, Compound)> {
        let kind = TagType::from_id(self.u8()?)?;
        if kind != TagType::Compound {
            return Err(NbtError::RootNotCompound(kind.name()));
        }
        let name = self.string()?;
        let root = self.compound()?;
        Ok((name, root))
    }

    fn bytes<const N: usize>(&mut self) -> NbtResult<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf).map_err(eof)?;
        Ok(buf)
    }

    fn u8(&mut self) -> NbtResult<u8> {
        Ok(self.bytes::<1>()?[0])
    }

    fn i8(&mut self) -> NbtResult<i8> {
        Ok(i8::from_le_bytes(self.bytes()?))
    }

    fn i16(&mut self) -> NbtResult<i16> {
        Ok(i16::from_le_bytes(self.bytes()?))
    }

    fn i32(&mut self) -> NbtResult<i32> {
        Ok(i32::from_le_bytes(self.bytes()?))
    }

    fn i64(&mut self) -> NbtResult<i64> {
        Ok(i64::from_le_bytes(self.bytes()?))
    }

    fn len(&mut self) -> NbtResult<usize> {
        let len = self.i32()?;
        usize::try_from(len).map_err(|_| NbtError::InvalidLength(i64::from(len)))
    }

    fn string(&mut self) -> NbtResult<String> {
        let len = u16::from_le_bytes(self.bytes()?);
        let mut buf = vec![0u8; usize::from(len)];
        self.inner.read_exact(&mut buf).map_err(eof)?;
        String::from_utf8(buf).map_err(|_| NbtError::InvalidUtf8)
    }

    fn enter(&mut self) -> NbtResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(NbtError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    fn compound(&mut self) -> NbtResult<Compound> {
        self.enter()?;
        let mut compound = Compound::new();
        loop {
            let kind = TagType::from_id(self.u8()?)?;
            if kind == TagType::End {
                break;
            }
            let name = self.string()?;
            let tag = self.payload(kind)?;
            compound.insert(name, tag);
        }
        self.depth -= 1;
        Ok(compound)
    }

    fn list(&mut self) -> NbtResult<List> {
        self.enter()?;
        let element = TagType::from_id(self.u8()?)?;
        let len = self.len()?;
        // A corrupt length must not trigger a huge allocation up front.
        let mut values = Vec::with_capacity(len.min(4096));
        if element != TagType::End {
            for _ in 0..len {
                values.push(self.payload(element)?);
            }
        }
        self.depth -= 1;
        List::new(element, values)
    }

    fn payload(&mut self, kind: TagType) -> NbtResult<Tag> {
        Ok(match kind {
            TagType::End => return Err(NbtError::UnknownTag(0)),
            TagType::Byte => Tag::Byte(self.i8()?),
            TagType::Short => Tag::Short(self.i16()?),
            TagType::Int => Tag::Int(self.i32()?),
            TagType::Long => Tag::Long(self.i64()?),
            TagType::Float => Tag::Float(f32::from_le_bytes(self.bytes()?)),
            TagType::Double => Tag::Double(f64::from_le_bytes(self.bytes()?)),
            TagType::ByteArray => {
                let len = self.len()?;
                let mut buf = Vec::new();
                (&mut self.inner)
                    .take(len as u64)
                    .read_to_end(&mut buf)?;
                if buf.len() != len {
                    return Err(NbtError::UnexpectedEof);
                }
                Tag::ByteArray(buf.into_iter().map(u8::cast_signed).collect())
            }
            TagType::String => Tag::String(self.string()?),
            TagType::List => Tag::List(self.list()?),
            TagType::Compound => Tag::Compound(self.compound()?),
            TagType::IntArray => {
                let len = self.len()?;
                let mut values = Vec::with_capacity(len.min(4096));
                for _ in 0..len {
                    values.push(self.i32()?);
                }
                Tag::IntArray(values)
            }
            TagType::LongArray => {
                let len = self.len()?;
                let mut values = Vec::with_capacity(len.min(4096));
                for _ in 0..len {
                    values.push(self.i64()?);
                }
                Tag::LongArray(values)
            }
        })
    }
}

fn eof(err: std::io::Error) -> NbtError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        NbtError::UnexpectedEof
    } else {
        NbtError::Io(err)
    }
}
