// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

use semver::Version;

use super::manifest::Manifest;
use super::{
    Behavior, FlatWorldLayers, FlatWorldLayersVersions, LevelVersions, PackContext, PackResources,
    StructureFile, StructureMetadata, TargetType, World,
};
use crate::archive::{entry_names, extract_entry};
use crate::error::{BotError, PackError};
use crate::nbt::{self, Compound, List};
use crate::structure::fixtures::{V1_16, V1_19_50, filled};
use crate::structure::{Coordinate, Identifier};

fn level_versions() -> LevelVersions {
    LevelVersions {
        generator: 2,
        minimum_compatible_client_version: vec![1, 20, 0, 0, 0],
        world_version: 1,
        inventory_version: Version::new(1, 20, 10),
        storage_version: 10,
        network_version: 594,
        flat_world_layers: FlatWorldLayersVersions {
            encoding_version: 6,
            world_version: "version.post_1_18".to_string(),
        },
    }
}

fn file(id: &str, bytes: Vec<u8>) -> StructureFile {
    StructureFile {
        identifier: id.parse::<Identifier>().unwrap(),
        bytes,
    }
}

fn house() -> StructureFile {
    file("house", filled([2, 3, 4], "minecraft:stone", V1_16))
}

struct Fixture {
    resources: PackResources,
    versions: LevelVersions,
    generator: Version,
}

impl Fixture {
    fn new() -> Self {
        Self {
            resources: PackResources::default(),
            versions: level_versions(),
            generator: Version::new(1, 1, 0),
        }
    }

    fn ctx(&self) -> PackContext<'_> {
        PackContext {
            resources: &self.resources,
            level_versions: Some(&self.versions),
            generator_version: &self.generator,
        }
    }
}

fn pack_error(err: BotError) -> PackError {
    match err {
        BotError::Pack(e) => *e,
        other => panic!("expected pack error, got {other}"),
    }
}

#[test]
fn test_behavior_pack_contents() {
    let fixture = Fixture::new();
    let files = vec![
        house(),
        file("castle:towers/west", filled([1, 1, 1], "minecraft:mangrove_log", V1_19_50)),
    ];
    let generated = TargetType::Behavior.convert(files, &fixture.ctx()).unwrap();
    assert_eq!(generated.len(), 1);
    assert_eq!(generated[0].filename, "house.mcpack");

    let bytes = &generated[0].bytes;
    assert_eq!(
        entry_names(bytes).unwrap(),
        [
            "manifest.json",
            "metadata.json",
            "structures/house.mcstructure",
            "structures/castle/towers/west.mcstructure",
        ]
    );

    let manifest =
        Manifest::from_json(&String::from_utf8(extract_entry(bytes, "manifest.json").unwrap()).unwrap())
            .unwrap();
    let header = manifest.header();
    assert_eq!(header.name(), "Structures: house");
    assert_eq!(
        header.description(),
        Some("Structures: mystructure:house, castle:towers/west\n*Generated with Erutcurts")
    );
    assert_eq!(header.min_engine_version(), Some(&Version::new(1, 19, 50)));
    assert_eq!(
        manifest.metadata().unwrap().generated_with()["Erutcurts"],
        [Version::new(1, 1, 0)]
    );
    assert_eq!(
        extract_entry(bytes, "structures/house.mcstructure").unwrap(),
        house().bytes
    );
}

#[test]
fn test_metadata_json() {
    let fixture = Fixture::new();
    let behavior = Behavior::new(vec![house()], &fixture.ctx()).unwrap();
    let metadata: Vec<StructureMetadata> = behavior.metadata().cloned().collect();
    insta::assert_snapshot!(StructureMetadata::list_to_json(&metadata).unwrap(), @r#"
    [
      {
        "identifier": "mystructure:house",
        "min_engine_version": "1.16.0",
        "size": {
          "x": 2,
          "y": 3,
          "z": 4
        }
      }
    ]
    "#);
}

#[test]
fn test_pack_name_is_sanitized() {
    let fixture = Fixture::new();
    let behavior = Behavior::new(
        vec![file("castle:towers/west", filled([1, 1, 1], "minecraft:stone", V1_16))],
        &fixture.ctx(),
    )
    .unwrap();
    assert_eq!(behavior.pack_name(), "castle_towers_west");
    assert_eq!(behavior.file_name(), "castle_towers_west.mcpack");
}

#[test]
fn test_duplicate_and_empty_inputs() {
    let fixture = Fixture::new();
    let err = Behavior::new(vec![house(), house()], &fixture.ctx()).unwrap_err();
    assert!(matches!(pack_error(err), PackError::Duplicate(id) if id == "mystructure:house"));

    let err = TargetType::World.convert(Vec::new(), &fixture.ctx()).unwrap_err();
    assert!(matches!(pack_error(err), PackError::Empty));
}

#[test]
fn test_single_behavior_splits_files() {
    let fixture = Fixture::new();
    let files = vec![house(), file("tower", filled([1, 5, 1], "minecraft:stone", V1_16))];
    let names: Vec<String> = TargetType::SingleBehavior
        .convert(files, &fixture.ctx())
        .unwrap()
        .into_iter()
        .map(|f| f.filename)
        .collect();
    assert_eq!(names, ["house.mcpack", "tower.mcpack"]);
}

#[test]
fn test_world_requires_level_versions() {
    let fixture = Fixture::new();
    let ctx = PackContext {
        level_versions: None,
        ..fixture.ctx()
    };
    let err = TargetType::World.convert(vec![house()], &ctx).unwrap_err();
    assert!(matches!(pack_error(err), PackError::MissingLevelVersions));
}

#[test]
fn test_world_contents() {
    let fixture = Fixture::new();
    let generated = TargetType::World
        .convert(vec![house()], &fixture.ctx())
        .unwrap();
    assert_eq!(generated[0].filename, "house.mcworld");
    let bytes = &generated[0].bytes;

    assert_eq!(
        entry_names(bytes).unwrap(),
        [
            "level.dat",
            "world_behavior_packs.json",
            "behavior_packs/house/manifest.json",
            "behavior_packs/house/metadata.json",
            "behavior_packs/house/structures/house.mcstructure",
            "behavior_packs/house/functions/tick.json",
            "behavior_packs/house/functions/internal/first_load.mcfunction",
            "behavior_packs/house/functions/reload_all_structures.mcfunction",
            "behavior_packs/house/functions/reload/house.mcfunction",
        ]
    );

    let read = |name: &str| String::from_utf8(extract_entry(bytes, name).unwrap()).unwrap();

    let (storage_version, level) = nbt::read_level_dat(&extract_entry(bytes, "level.dat").unwrap()).unwrap();
    assert_eq!(storage_version, 10);
    assert_eq!(level.get_string("LevelName").unwrap(), "Structures: house");
    assert_eq!(
        level.get_string("FlatWorldLayers").unwrap(),
        r#"{"block_layers":[],"biome_id":1,"structure_options":null,"encoding_version":6,"world_version":"version.post_1_18"}"#
    );
    assert_eq!(level.get_string("InventoryVersion").unwrap(), "1.20.10");
    assert_eq!(level.get_int("NetworkVersion").unwrap(), 594);

    let manifest = Manifest::from_json(&read("behavior_packs/house/manifest.json")).unwrap();
    assert_eq!(
        manifest.header().min_engine_version(),
        Some(&Version::new(1, 19, 50))
    );

    let packs: serde_json::Value =
        serde_json::from_str(&read("world_behavior_packs.json")).unwrap();
    assert_eq!(
        packs,
        serde_json::json!([{
            "pack_id": manifest.header().uuid().to_string(),
            "version": [1, 0, 0],
        }])
    );

    insta::assert_snapshot!(read("behavior_packs/house/functions/tick.json"), @r#"
    {
      "values": [
        "internal/first_load"
      ]
    }
    "#);
    assert_eq!(
        read("behavior_packs/house/functions/reload_all_structures.mcfunction"),
        "function reload/house"
    );
    assert_eq!(
        read("behavior_packs/house/functions/reload/house.mcfunction"),
        "structure load mystructure:house 0 0 0"
    );
    assert!(
        read("behavior_packs/house/functions/internal/first_load.mcfunction")
            .contains("function reload_all_structures")
    );
}

#[test]
fn test_world_grid_layout() {
    let fixture = Fixture::new();
    let files = ["e", "b", "d", "a", "c"]
        .into_iter()
        .map(|id| file(id, filled([4, 1, 2], "minecraft:stone", V1_16)))
        .collect();
    let world = World::new(files, &fixture.ctx()).unwrap();
    assert_eq!(world.world_name(), "e");

    let placed: Vec<(String, Coordinate)> = world
        .behavior()
        .metadata()
        .map(|m| (m.identifier.to_string_without_default_namespace(), m.coordinate.unwrap()))
        .collect();
    assert_eq!(
        placed,
        [
            ("a".to_string(), Coordinate::new(-7, 0, -7)),
            ("b".to_string(), Coordinate::new(-7, 0, 0)),
            ("c".to_string(), Coordinate::new(-7, 0, 7)),
            ("d".to_string(), Coordinate::new(0, 0, -7)),
            ("e".to_string(), Coordinate::new(0, 0, 0)),
        ]
    );
    assert_eq!(
        world.reload_all_function(),
        "function reload/a\nfunction reload/b\nfunction reload/c\nfunction reload/d\nfunction reload/e"
    );
}

#[test]
fn test_reload_paths_follow_namespace_directories() {
    let fixture = Fixture::new();
    let files = vec![file("castle:towers/west", filled([1, 1, 1], "minecraft:stone", V1_16))];
    let world = World::new(files, &fixture.ctx()).unwrap();
    assert_eq!(world.reload_all_function(), "function reload/castle/towers/west");

    let bytes = world_bytes(&world);
    let command = extract_entry(
        &bytes,
        "behavior_packs/castle_towers_west/functions/reload/castle/towers/west.mcfunction",
    )
    .unwrap();
    assert_eq!(command, b"structure load castle:towers/west 0 0 0");
}

fn world_bytes(world: &World) -> Vec<u8> {
    let mut sink = crate::archive::ZipSink::new();
    world.write_to(&mut sink).unwrap();
    sink.finish().unwrap()
}

#[test]
fn test_level_versions_capture_and_apply() {
    let versions = level_versions();
    let mut level = super::level::builtin_template();
    level.insert(
        "FlatWorldLayers",
        versions.void_layers().to_json().unwrap(),
    );
    versions.apply(&mut level);

    let captured = LevelVersions::from_level(&level).unwrap();
    assert_eq!(captured, versions);

    let bytes = nbt::write_level_dat(versions.storage_version, &level).unwrap();
    assert_eq!(LevelVersions::from_level_dat(&bytes).unwrap(), versions);
}

#[test]
fn test_level_versions_validation() {
    let mut level = Compound::new()
        .with("FlatWorldLayers", level_versions().void_layers().to_json().unwrap());
    level_versions().apply(&mut level);
    level.insert("MinimumCompatibleClientVersion", List::of_ints([1, 20, 0]));
    let err = LevelVersions::from_level(&level).unwrap_err();
    assert!(matches!(pack_error(err), PackError::InvalidLevelVersions(_)));

    level_versions().apply(&mut level);
    level.remove("NetworkVersion");
    assert!(matches!(
        LevelVersions::from_level(&level).unwrap_err(),
        BotError::Nbt(_)
    ));
}

#[test]
fn test_level_versions_document_json() {
    let json = serde_json::to_value(level_versions()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "generator": 2,
            "minimumCompatibleClientVersion": [1, 20, 0, 0, 0],
            "worldVersion": 1,
            "inventoryVersion": "1.20.10",
            "storageVersion": 10,
            "networkVersion": 594,
            "flatWorldLayers": {
                "encodingVersion": 6,
                "worldVersion": "version.post_1_18",
            },
        })
    );
}

#[test]
fn test_flat_world_layers_from_game_json() {
    let json = r#"{"biome_id":1,"block_layers":[{"block_name":"minecraft:bedrock","count":1},{"block_name":"minecraft:grass","count":1}],"encoding_version":6,"structure_options":null,"world_version":"version.post_1_18"}"#;
    let layers = FlatWorldLayers::from_json(json).unwrap();
    assert_eq!(layers.block_layers.len(), 2);
    assert_eq!(layers.encoding_version, 6);
    assert!(FlatWorldLayers::from_json(r#"{"block_layers":[],"biome_id":1,"structure_options":null,"encoding_version":0,"world_version":"x"}"#).is_err());
}

#[test]
fn test_resources_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("pack_icon.png"), b"png").unwrap();
    std::fs::write(dir.path().join("first_load_function.mcfunction"), b"say hi").unwrap();

    let resources = PackResources::load(Some(dir.path())).unwrap();
    assert_eq!(resources.pack_icon.as_deref(), Some(&b"png"[..]));
    assert!(resources.world_icon.is_none());
    assert_eq!(resources.first_load_function, "say hi");

    let version = Version::new(1, 1, 0);
    let ctx = PackContext {
        resources: &resources,
        level_versions: None,
        generator_version: &version,
    };
    let generated = TargetType::Behavior.convert(vec![house()], &ctx).unwrap();
    assert_eq!(extract_entry(&generated[0].bytes, "pack_icon.png").unwrap(), b"png");
}

#[test]
fn test_convert_unpacked_writes_directories() {
    let fixture = Fixture::new();
    let out = tempfile::tempdir().unwrap();
    std::fs::create_dir(out.path().join("house")).unwrap();

    let written = TargetType::Behavior
        .convert_unpacked(vec![house()], &fixture.ctx(), out.path())
        .unwrap();
    assert_eq!(written, [out.path().join("house_1")]);
    assert!(out.path().join("house_1/structures/house.mcstructure").is_file());
}

#[test]
fn test_target_type_names() {
    let names: Vec<String> = TargetType::ALL.iter().map(ToString::to_string).collect();
    assert_eq!(names, ["behavior", "single-behavior", "world"]);
    assert_eq!("world".parse::<TargetType>(), Ok(TargetType::World));
    assert!("structura".parse::<TargetType>().is_err());
    assert!(!TargetType::SingleBehavior.is_multiple_files());
}
