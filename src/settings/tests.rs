// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use super::{
    GuildSettings, SETTINGS_DOCUMENT, SettingsList, guild_settings, is_auto_generation_enabled,
    retain_guilds, set_auto_generation,
};
use crate::store::{DocumentBackend, DocumentStore, LocalBackend};

fn local_store(dir: &std::path::Path) -> (Arc<LocalBackend>, DocumentStore) {
    let backend = Arc::new(LocalBackend::new(dir));
    let store = DocumentStore::new(
        Arc::clone(&backend) as Arc<dyn DocumentBackend>,
        Duration::from_secs(60),
    );
    (backend, store)
}

#[test]
fn test_document_json_shape() {
    let list: SettingsList = serde_json::from_str(
        r#"[{"guildId": "2", "packAutoGeneration": false}, {"guildId": "1"}]"#,
    )
    .unwrap();
    let list = list.normalized();

    // guild 1 only has default values
    assert_eq!(
        list.as_slice(),
        [GuildSettings {
            guild_id: "2".to_string(),
            pack_auto_generation: false,
        }]
    );
    assert_eq!(
        serde_json::to_string(&list).unwrap(),
        r#"[{"guildId":"2","packAutoGeneration":false}]"#
    );
}

#[test]
fn test_set_keeps_sorted_non_default() {
    let mut list = SettingsList::default();
    for id in ["30", "10", "20"] {
        let mut settings = GuildSettings::new(id);
        settings.pack_auto_generation = false;
        list.set(settings);
    }
    let ids: Vec<_> = list.as_slice().iter().map(|s| s.guild_id.as_str()).collect();
    assert_eq!(ids, ["10", "20", "30"]);

    list.set(GuildSettings::new("20"));
    assert_eq!(list.as_slice().len(), 2);
    assert!(list.get("20").pack_auto_generation);
}

#[test]
fn test_display_fields() {
    let mut settings = GuildSettings::new("1");
    assert_eq!(
        settings.display_fields(),
        [("ストラクチャーファイル自動変換", "有効")]
    );
    settings.pack_auto_generation = false;
    assert_eq!(settings.display_fields()[0].1, "無効");
}

#[tokio::test]
async fn test_auto_generation_defaults_to_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let (_, store) = local_store(dir.path());
    assert!(is_auto_generation_enabled(&store, "123").await.unwrap());
}

#[tokio::test]
async fn test_set_auto_generation_persists_on_flush() {
    let dir = tempfile::tempdir().unwrap();
    let (backend, store) = local_store(dir.path());

    let settings = set_auto_generation(&store, "123", false).await.unwrap();
    assert!(!settings.pack_auto_generation);
    assert!(!is_auto_generation_enabled(&store, "123").await.unwrap());
    assert!(backend.load(SETTINGS_DOCUMENT).await.unwrap().is_none());

    store.flush().await.unwrap();
    let saved = backend.load(SETTINGS_DOCUMENT).await.unwrap().unwrap();
    let saved: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(
        saved,
        serde_json::json!([{"guildId": "123", "packAutoGeneration": false}])
    );

    // turning it back on removes the entry
    set_auto_generation(&store, "123", true).await.unwrap();
    assert_eq!(
        guild_settings(&store, "123").await.unwrap(),
        GuildSettings::new("123")
    );
}

#[tokio::test]
async fn test_retain_guilds_prunes_departed() {
    let dir = tempfile::tempdir().unwrap();
    let (_, store) = local_store(dir.path());
    set_auto_generation(&store, "1", false).await.unwrap();
    set_auto_generation(&store, "2", false).await.unwrap();

    let active = BTreeSet::from(["2".to_string()]);
    assert_eq!(retain_guilds(&store, &active).await.unwrap(), 1);
    assert!(is_auto_generation_enabled(&store, "1").await.unwrap());
    assert!(!is_auto_generation_enabled(&store, "2").await.unwrap());
    assert_eq!(retain_guilds(&store, &active).await.unwrap(), 0);
}

#[tokio::test]
async fn test_retain_guilds_without_changes_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (backend, store) = local_store(dir.path());

    assert_eq!(retain_guilds(&store, &BTreeSet::new()).await.unwrap(), 0);
    store.flush().await.unwrap();
    assert!(backend.load(SETTINGS_DOCUMENT).await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_changes_are_all_kept() {
    let dir = tempfile::tempdir().unwrap();
    let (_, store) = local_store(dir.path());

    let (first, second) = tokio::join!(
        set_auto_generation(&store, "1", false),
        set_auto_generation(&store, "2", false),
    );
    first.unwrap();
    second.unwrap();

    assert!(!is_auto_generation_enabled(&store, "1").await.unwrap());
    assert!(!is_auto_generation_enabled(&store, "2").await.unwrap());
}
