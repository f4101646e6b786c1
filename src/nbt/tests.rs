// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

use super::{
    Compound, List, MAX_DEPTH, Tag, TagType, read_level_dat, read_root, write_level_dat, write_root,
};
use crate::error::NbtError;

/// `{"": {format_version: 1, name: "ab"}}` encoded by hand.
fn sample_bytes() -> Vec<u8> {
    let mut b = vec![10, 0, 0];
    b.extend([3, 14, 0]);
    b.extend(b"format_version");
    b.extend(1i32.to_le_bytes());
    b.extend([8, 4, 0]);
    b.extend(b"name");
    b.extend([2, 0]);
    b.extend(b"ab");
    b.push(0);
    b
}

#[test]
fn test_read_little_endian_root() {
    let (name, root) = read_root(&sample_bytes()).unwrap();
    assert_eq!(name, "");
    assert_eq!(root.get_int("format_version").unwrap(), 1);
    assert_eq!(root.get_string("name").unwrap(), "ab");
}

#[test]
fn test_writer_matches_hand_encoding() {
    let root = Compound::new()
        .with("format_version", 1)
        .with("name", "ab");
    assert_eq!(write_root("", &root).unwrap(), sample_bytes());
}

#[test]
fn test_truncated_input() {
    let bytes = sample_bytes();
    let err = read_root(&bytes[..bytes.len() - 3]).unwrap_err();
    assert!(matches!(err, NbtError::UnexpectedEof));
}

#[test]
fn test_root_must_be_compound() {
    let err = read_root(&[3, 0, 0, 1, 0, 0, 0]).unwrap_err();
    assert!(matches!(err, NbtError::RootNotCompound("Int")));
}

#[test]
fn test_unknown_tag_id() {
    let err = read_root(&[10, 0, 0, 42, 0, 0]).unwrap_err();
    assert!(matches!(err, NbtError::UnknownTag(42)));
}

#[test]
fn test_negative_list_length() {
    let mut b = vec![10, 0, 0, 9, 1, 0, b'l', 3];
    b.extend((-1i32).to_le_bytes());
    let err = read_root(&b).unwrap_err();
    assert!(matches!(err, NbtError::InvalidLength(-1)));
}

#[test]
fn test_nested_lists_and_arrays() {
    let root = Compound::new()
        .with(
            "block_indices",
            List::new(
                TagType::List,
                vec![
                    Tag::List(List::of_ints([0, -1])),
                    Tag::List(List::of_ints([-1, -1])),
                ],
            )
            .unwrap(),
        )
        .with("bytes", Tag::ByteArray(vec![-1, 0, 1]))
        .with("longs", Tag::LongArray(vec![i64::MIN]))
        .with("empty", List::empty(TagType::Compound));

    let (_, decoded) = read_root(&write_root("", &root).unwrap()).unwrap();
    assert_eq!(decoded, root);

    let layers = decoded.get_list("block_indices").unwrap();
    let first = layers.lists("block_indices").unwrap()[0];
    assert_eq!(first.ints("block_indices").unwrap(), vec![0, -1]);
    assert_eq!(decoded.get_list("empty").unwrap().element(), TagType::Compound);
}

#[test]
fn test_mixed_list_rejected() {
    let err = List::new(TagType::Int, vec![Tag::Int(1), Tag::Long(2)]).unwrap_err();
    assert!(matches!(
        err,
        NbtError::MixedList {
            expected: "Int",
            found: "Long"
        }
    ));
}

#[test]
fn test_typed_accessor_errors() {
    let root = Compound::new().with("size", 3);
    assert!(matches!(
        root.get_list("size").unwrap_err(),
        NbtError::WrongType {
            expected: "List",
            found: "Int",
            ..
        }
    ));
    assert!(matches!(
        root.get_int("missing").unwrap_err(),
        NbtError::MissingTag(name) if name == "missing"
    ));
    assert!(root.opt_compound("missing").unwrap().is_none());
}

#[test]
fn test_insert_replaces_in_place() {
    let mut root = Compound::new().with("a", 1).with("b", 2);
    root.insert("a", "x");
    let names: Vec<_> = root.iter().map(|(n, _)| n).collect();
    assert_eq!(names, ["a", "b"]);
    assert_eq!(root.get_string("a").unwrap(), "x");
    assert_eq!(root.remove("b"), Some(Tag::Int(2)));
    assert_eq!(root.len(), 1);
}

#[test]
fn test_level_dat_header() {
    let root = Compound::new().with("LevelName", "Structures: house");
    let bytes = write_level_dat(10, &root).unwrap();
    assert_eq!(&bytes[..4], &10i32.to_le_bytes());
    let declared = i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    assert_eq!(usize::try_from(declared).unwrap(), bytes.len() - 8);

    let (version, decoded) = read_level_dat(&bytes).unwrap();
    assert_eq!(version, 10);
    assert_eq!(decoded, root);
}

#[test]
fn test_level_dat_length_mismatch() {
    let root = Compound::new().with("a", 1);
    let mut bytes = write_level_dat(10, &root).unwrap();
    bytes.push(0);
    assert!(matches!(
        read_level_dat(&bytes).unwrap_err(),
        NbtError::HeaderLength { .. }
    ));
}

/// Root compound holding `lists` lists nested inside each other.
fn nested_lists(lists: usize) -> Vec<u8> {
    let mut b = vec![10, 0, 0, 9, 1, 0, b'a'];
    for _ in 1..lists {
        b.push(9);
        b.extend(1i32.to_le_bytes());
    }
    b.push(0);
    b.extend(0i32.to_le_bytes());
    b.push(0);
    b
}

#[test]
fn test_nesting_depth_limit() {
    // the root compound is the first level
    let (_, root) = read_root(&nested_lists(MAX_DEPTH - 1)).unwrap();
    assert_eq!(root.get_list("a").unwrap().len(), 1);

    assert!(matches!(
        read_root(&nested_lists(MAX_DEPTH)),
        Err(NbtError::TooDeep(512))
    ));
}
