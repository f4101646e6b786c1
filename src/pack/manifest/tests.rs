// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use semver::Version;
use uuid::Uuid;

use super::{
    Manifest, ManifestDependency, ManifestHeader, ManifestMetadata, ManifestModule,
    ManifestSubpack, ModuleType, ScriptLanguage,
};
use crate::error::PackError;

const PACK_UUID: Uuid = Uuid::from_u128(0x1111_2222_3333_4444_5555_6666_7777_8888);
const MODULE_UUID: Uuid = Uuid::from_u128(0x9999_aaaa_bbbb_cccc_dddd_eeee_ffff_0000);

fn data_header(min_engine: Version) -> ManifestHeader {
    ManifestHeader::builder()
        .pack_type(ModuleType::Data)
        .name("Structures: house")
        .description("Structures: mystructure:house")
        .uuid(PACK_UUID)
        .min_engine_version(min_engine)
        .build()
        .unwrap()
}

fn data_module() -> ManifestModule {
    ManifestModule::builder()
        .module_type(ModuleType::Data)
        .uuid(MODULE_UUID)
        .build()
        .unwrap()
}

fn is_invalid<T: std::fmt::Debug>(result: Result<T, PackError>) -> bool {
    matches!(result, Err(PackError::InvalidManifest(_)))
}

#[test]
fn test_behavior_manifest_json() {
    let metadata = ManifestMetadata::builder()
        .generated_with(BTreeMap::from([(
            "Erutcurts".to_string(),
            vec![Version::new(1, 1, 0)],
        )]))
        .build()
        .unwrap();
    let manifest = Manifest::builder()
        .header(data_header(Version::new(1, 19, 50)))
        .modules(vec![data_module()])
        .metadata(metadata)
        .build()
        .unwrap();

    insta::assert_snapshot!(manifest.to_json().unwrap(), @r#"
    {
      "format_version": 2,
      "header": {
        "name": "Structures: house",
        "description": "Structures: mystructure:house",
        "uuid": "11112222-3333-4444-5555-666677778888",
        "version": [
          1,
          0,
          0
        ],
        "min_engine_version": [
          1,
          19,
          50
        ]
      },
      "modules": [
        {
          "type": "data",
          "uuid": "9999aaaa-bbbb-cccc-dddd-eeeeffff0000",
          "version": [
            1,
            0,
            0
          ]
        }
      ],
      "metadata": {
        "generated_with": {
          "Erutcurts": [
            "1.1.0"
          ]
        }
      }
    }
    "#);
}

#[test]
fn test_from_json_accepts_both_version_forms() {
    let json = r#"{
        "format_version": 2,
        "header": {
            "name": "pack",
            "uuid": "11112222-3333-4444-5555-666677778888",
            "version": "1.2.3-beta.1",
            "min_engine_version": [1, 20, 0]
        },
        "modules": [{
            "type": "script",
            "uuid": "9999aaaa-bbbb-cccc-dddd-eeeeffff0000",
            "version": [1, 0, 0],
            "entry": "scripts/main.js",
            "language": "javascript"
        }]
    }"#;
    let manifest = Manifest::from_json(json).unwrap();
    assert_eq!(manifest.header().pack_type(), ModuleType::Script);
    assert_eq!(
        manifest.header().version(),
        &Version::parse("1.2.3-beta.1").unwrap()
    );

    let written = manifest.to_json().unwrap();
    assert!(written.contains(r#""version": "1.2.3-beta.1""#));
    assert!(written.contains(r#""language": "JavaScript""#));
    assert_eq!(Manifest::from_json(&written).unwrap(), manifest);
}

#[test]
fn test_behavior_header_rules() {
    let below_lowest = ManifestHeader::builder()
        .pack_type(ModuleType::Data)
        .name("pack")
        .min_engine_version(Version::new(1, 12, 0))
        .build();
    assert!(is_invalid(below_lowest));

    let missing = ManifestHeader::builder()
        .pack_type(ModuleType::Interface)
        .name("pack")
        .build();
    assert!(is_invalid(missing));

    let blank = ManifestHeader::builder()
        .pack_type(ModuleType::Resources)
        .name(" ")
        .min_engine_version(Version::new(1, 13, 0))
        .build();
    assert!(is_invalid(blank));

    let with_base_game = ManifestHeader::builder()
        .pack_type(ModuleType::Data)
        .name("pack")
        .min_engine_version(Version::new(1, 13, 0))
        .base_game_version(Version::new(1, 13, 0))
        .build();
    assert!(is_invalid(with_base_game));
}

#[test]
fn test_world_template_header_rules() {
    let ok = ManifestHeader::builder()
        .pack_type(ModuleType::WorldTemplate)
        .name("template")
        .base_game_version(Version::new(1, 19, 0))
        .lock_template_options(true)
        .build();
    assert!(ok.is_ok());

    let no_lock = ManifestHeader::builder()
        .pack_type(ModuleType::WorldTemplate)
        .name("template")
        .base_game_version(Version::new(1, 19, 0))
        .build();
    assert!(is_invalid(no_lock));

    let skin = ManifestHeader::builder()
        .pack_type(ModuleType::SkinPack)
        .name("skins")
        .platform_locked(false)
        .build();
    assert!(is_invalid(skin));
}

#[test]
fn test_incompatible_modules_rejected() {
    let resources = ManifestModule::builder()
        .module_type(ModuleType::Resources)
        .build()
        .unwrap();
    let result = Manifest::builder()
        .header(data_header(Version::new(1, 13, 0)))
        .modules(vec![data_module(), resources])
        .build();
    assert!(is_invalid(result));

    let empty = Manifest::builder()
        .header(data_header(Version::new(1, 13, 0)))
        .modules(Vec::new())
        .build();
    assert!(is_invalid(empty));
}

#[test]
fn test_format_version_must_be_two() {
    let result = Manifest::builder()
        .format_version(1)
        .header(data_header(Version::new(1, 13, 0)))
        .modules(vec![data_module()])
        .build();
    assert!(is_invalid(result));
}

#[test]
fn test_subpack_rules() {
    let subpack = |folder: &str| {
        ManifestSubpack::builder()
            .folder_name(folder)
            .name("High")
            .memory_tier(2)
            .build()
    };
    assert!(is_invalid(subpack("a/b")));
    assert!(is_invalid(subpack("..")));

    let negative = ManifestSubpack::builder()
        .folder_name("low")
        .name("Low")
        .memory_tier(-1)
        .build();
    assert!(is_invalid(negative));

    let resources_header = ManifestHeader::builder()
        .pack_type(ModuleType::Resources)
        .name("textures")
        .min_engine_version(Version::new(1, 13, 0))
        .build()
        .unwrap();
    let resources_module = ManifestModule::builder()
        .module_type(ModuleType::Resources)
        .build()
        .unwrap();
    let single = Manifest::builder()
        .header(resources_header.clone())
        .modules(vec![resources_module.clone()])
        .subpacks(vec![subpack("high").unwrap()])
        .build();
    assert!(is_invalid(single));

    let pair = Manifest::builder()
        .header(resources_header)
        .modules(vec![resources_module])
        .subpacks(vec![subpack("high").unwrap(), subpack("low").unwrap()])
        .build();
    assert!(pair.is_ok());

    let behavior_with_subpacks = Manifest::builder()
        .header(data_header(Version::new(1, 13, 0)))
        .modules(vec![data_module()])
        .subpacks(vec![subpack("high").unwrap(), subpack("low").unwrap()])
        .build();
    assert!(is_invalid(behavior_with_subpacks));
}

#[test]
fn test_script_module_rules() {
    let script = |entry: &str| {
        ManifestModule::builder()
            .module_type(ModuleType::Script)
            .entry(entry)
            .language(ScriptLanguage::JavaScript)
            .build()
    };
    assert!(script("scripts/main.js").is_ok());
    assert!(is_invalid(script("main.js")));
    assert!(is_invalid(script("scripts/lib/main.js")));
    assert!(is_invalid(script("scripts/main.ts")));

    let data_with_entry = ManifestModule::builder()
        .module_type(ModuleType::Data)
        .entry("scripts/main.js")
        .build();
    assert!(is_invalid(data_with_entry));
}

#[test]
fn test_dependency_rules() {
    let both = ManifestDependency::builder()
        .uuid(PACK_UUID)
        .module_name("@minecraft/server")
        .version(Version::new(1, 0, 0))
        .build();
    assert!(is_invalid(both));

    let neither = ManifestDependency::builder()
        .version(Version::new(1, 0, 0))
        .build();
    assert!(is_invalid(neither));

    let from_module = ManifestDependency::from_module(&data_module());
    assert!(from_module.validate().is_ok());
}

#[test]
fn test_metadata_rules() {
    let blank_author = ManifestMetadata::builder()
        .authors(vec!["Risu".to_string(), String::new()])
        .build();
    assert!(is_invalid(blank_author));

    let bad_url = ManifestMetadata::builder().url("not a url").build();
    assert!(is_invalid(bad_url));

    let no_versions = ManifestMetadata::builder()
        .generated_with(BTreeMap::from([("tool".to_string(), Vec::new())]))
        .build();
    assert!(is_invalid(no_versions));
}

#[test]
fn test_raise_min_engine_version() {
    let mut header = data_header(Version::new(1, 16, 0));
    header.raise_min_engine_version(&Version::new(1, 19, 50));
    assert_eq!(header.min_engine_version(), Some(&Version::new(1, 19, 50)));
    header.raise_min_engine_version(&Version::new(1, 13, 0));
    assert_eq!(header.min_engine_version(), Some(&Version::new(1, 19, 50)));
}
