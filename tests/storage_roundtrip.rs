//! Storage integration tests: metadata import, inventory persistence and backups.

mod common;

use common::{fixture_root, fresh_inventory, sample_metadata};
use realmkeep::config::{Config, StorageConfig};
use realmkeep::storage::Storage;

fn storage_config(dir: &std::path::Path) -> StorageConfig {
    StorageConfig {
        data_dir: dir.join("data").to_string_lossy().to_string(),
        ..Config::default().storage
    }
}

#[tokio::test]
async fn empty_data_dir_has_nothing_stored() {
    let tmpdir = tempfile::tempdir().expect("tempdir");
    let storage = Storage::new(&storage_config(tmpdir.path())).await.expect("storage new");
    assert!(storage.data_dir().exists());
    assert!(storage.load_metadata().await.unwrap().is_none());
    assert!(storage.load_inventory().await.unwrap().is_none());
    assert!(!storage.delete_inventory().await.unwrap());
    assert!(!storage.export_inventory(&tmpdir.path().join("out.json")).await.unwrap());
}

#[tokio::test]
async fn metadata_import_is_stored() {
    let tmpdir = tempfile::tempdir().expect("tempdir");
    let storage = Storage::new(&storage_config(tmpdir.path())).await.expect("storage new");

    let imported = storage
        .import_metadata(&fixture_root().join("metadata.json"))
        .await
        .expect("import");
    assert_eq!(imported, sample_metadata());
    assert_eq!(storage.load_metadata().await.unwrap(), Some(imported));

    assert!(storage
        .import_metadata(&tmpdir.path().join("missing.json"))
        .await
        .is_err());
}

#[tokio::test]
async fn inventory_save_load_and_delete() {
    let tmpdir = tempfile::tempdir().expect("tempdir");
    let storage = Storage::new(&storage_config(tmpdir.path())).await.expect("storage new");
    let md = sample_metadata();
    let mut inv = fresh_inventory(&md);
    inv.set_material_count("Dye", 7).unwrap();

    storage.save_inventory(&inv).await.expect("save");
    assert_eq!(storage.load_inventory().await.unwrap(), Some(inv.clone()));

    // Overwrites replace the whole file
    inv.set_material_count("Dye", 2).unwrap();
    storage.save_inventory(&inv).await.expect("save");
    assert_eq!(storage.load_inventory().await.unwrap(), Some(inv));

    assert!(storage.delete_inventory().await.unwrap());
    assert!(storage.load_inventory().await.unwrap().is_none());
}

#[tokio::test]
async fn backup_export_then_import() {
    let tmpdir = tempfile::tempdir().expect("tempdir");
    let storage = Storage::new(&storage_config(tmpdir.path())).await.expect("storage new");
    let md = sample_metadata();
    let mut inv = fresh_inventory(&md);
    inv.set_companion_owned("Bennett", true).unwrap();
    storage.save_inventory(&inv).await.unwrap();

    let backup = tmpdir.path().join("backups").join("inventory.json");
    assert!(storage.export_inventory(&backup).await.unwrap());

    storage.delete_inventory().await.unwrap();
    let restored = storage.import_inventory(&backup).await.expect("import");
    assert_eq!(restored, inv);
    assert_eq!(storage.load_inventory().await.unwrap(), Some(inv));
}

#[tokio::test]
async fn invalid_inventory_is_rejected() {
    let tmpdir = tempfile::tempdir().expect("tempdir");
    let storage = Storage::new(&storage_config(tmpdir.path())).await.expect("storage new");

    let bad = tmpdir.path().join("bad.json");
    std::fs::write(
        &bad,
        r#"{"furnishings": {"Chair": {"owned": 1, "blueprint": false, "crafted": true}}}"#,
    )
    .unwrap();
    assert!(storage.import_inventory(&bad).await.is_err());
    assert!(storage.load_inventory().await.unwrap().is_none());

    let garbled = tmpdir.path().join("garbled.json");
    std::fs::write(&garbled, "{ not json").unwrap();
    assert!(storage.import_inventory(&garbled).await.is_err());
}

#[tokio::test]
async fn oversized_files_are_refused() {
    let tmpdir = tempfile::tempdir().expect("tempdir");
    let config = StorageConfig {
        max_file_bytes: 16,
        ..storage_config(tmpdir.path())
    };
    let storage = Storage::new(&config).await.expect("storage new");
    let err = storage
        .import_metadata(&fixture_root().join("metadata.json"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("exceeds"));
}

#[tokio::test]
async fn saves_leave_only_the_target_file() {
    let tmpdir = tempfile::tempdir().expect("tempdir");
    let storage = Storage::new(&storage_config(tmpdir.path())).await.expect("storage new");
    let md = sample_metadata();
    let mut inv = fresh_inventory(&md);

    for count in 1..=3 {
        inv.set_material_count("Fabric", count).unwrap();
        storage.save_inventory(&inv).await.expect("save");
    }
    storage.save_metadata(&md).await.expect("save metadata");

    let mut names: Vec<String> = std::fs::read_dir(storage.data_dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["inventory.json", "metadata.json"]);
    assert_eq!(storage.load_inventory().await.unwrap().unwrap().materials["Fabric"], 3);
}
