// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

use super::{ArchiveSink, DirSink, Prefixed, ZipSink, check_entry_path, entry_names, extract_entry};
use crate::error::{BotError, FsError};

#[test]
fn test_zip_sink_round_trips_entries() {
    let mut sink = ZipSink::new();
    sink.add_file("manifest.json", b"{}").unwrap();
    sink.add_file("structures/castle/west.mcstructure", &[1, 2, 3])
        .unwrap();
    let bytes = sink.finish().unwrap();

    assert_eq!(
        entry_names(&bytes).unwrap(),
        ["manifest.json", "structures/castle/west.mcstructure"]
    );
    assert_eq!(
        extract_entry(&bytes, "structures/castle/west.mcstructure").unwrap(),
        [1, 2, 3]
    );
}

#[test]
fn test_extract_entry_falls_back_to_file_name() {
    let mut sink = ZipSink::new();
    sink.add_file("My World/level.dat", b"level").unwrap();
    sink.add_file("My World/db/level.dat", b"nested").unwrap();
    let bytes = sink.finish().unwrap();
    assert_eq!(extract_entry(&bytes, "level.dat").unwrap(), b"level");
}

#[test]
fn test_extract_missing_entry() {
    let bytes = ZipSink::new().finish().unwrap();
    let err = extract_entry(&bytes, "level.dat").unwrap_err();
    assert!(matches!(err, BotError::Fs(e) if matches!(*e, FsError::NotFound(_))));
}

#[test]
fn test_extract_from_garbage() {
    assert!(extract_entry(b"not a zip", "level.dat").is_err());
}

#[test]
fn test_dir_sink_creates_parents() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = DirSink::new(dir.path().join("pack"));
    sink.add_file("functions/reload/house.mcfunction", b"structure load")
        .unwrap();
    let written =
        std::fs::read_to_string(dir.path().join("pack/functions/reload/house.mcfunction"))
            .unwrap();
    assert_eq!(written, "structure load");
}

#[test]
fn test_prefixed_sink() {
    let mut sink = ZipSink::new();
    {
        let mut prefixed = Prefixed::new(&mut sink, "behavior_packs/house/");
        prefixed.add_file("manifest.json", b"{}").unwrap();
    }
    let bytes = sink.finish().unwrap();
    assert_eq!(
        entry_names(&bytes).unwrap(),
        ["behavior_packs/house/manifest.json"]
    );
}

#[test]
fn test_unsafe_entry_paths() {
    for path in ["", "/etc/passwd", "../escape", "a/../../b", "a\\b"] {
        assert!(
            matches!(check_entry_path(path), Err(FsError::UnsafePath(_))),
            "{path:?} should be rejected"
        );
    }
    assert!(check_entry_path("behavior_packs/a/manifest.json").is_ok());

    let mut sink = ZipSink::new();
    assert!(sink.add_file("../x", b"").is_err());
}
