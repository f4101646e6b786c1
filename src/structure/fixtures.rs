// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Structure files built in memory for tests.

use crate::nbt::{Compound, List, Tag, TagType, write_root};

// 1.16.0.2
pub(crate) const V1_16: i32 = 17_825_794;
// 1.19.50.1
pub(crate) const V1_19_50: i32 = 18_035_201;

pub(crate) fn block(name: &str, version: i32) -> Compound {
    Compound::new()
        .with("name", name)
        .with("states", Compound::new())
        .with("version", version)
}

pub(crate) fn structure_bytes(
    size: [i32; 3],
    palette: Vec<Compound>,
    primary: Vec<i32>,
    secondary: Vec<i32>,
    position_data: Compound,
) -> Vec<u8> {
    let indices = List::new(
        TagType::List,
        vec![
            Tag::List(List::of_ints(primary)),
            Tag::List(List::of_ints(secondary)),
        ],
    )
    .unwrap();
    let default_palette = Compound::new()
        .with("block_palette", List::of_compounds(palette))
        .with("block_position_data", position_data);
    let root = Compound::new()
        .with("format_version", 1)
        .with("size", List::of_ints(size))
        .with(
            "structure",
            Compound::new()
                .with("block_indices", indices)
                .with("entities", List::empty(TagType::Compound))
                .with("palette", Compound::new().with("default", default_palette)),
        )
        .with("structure_world_origin", List::of_ints([10, -60, 3]));
    write_root("", &root).unwrap()
}

/// A solid cuboid of one block.
pub(crate) fn filled(size: [i32; 3], name: &str, version: i32) -> Vec<u8> {
    let volume = usize::try_from(size.iter().product::<i32>()).unwrap();
    structure_bytes(
        size,
        vec![block(name, version)],
        vec![0; volume],
        vec![-1; volume],
        Compound::new(),
    )
}
