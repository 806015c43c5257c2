//! Test utilities & fixtures.
//! Provides access to housing data under `tests/test-data-int` and small
//! in-code metadata builders for scenario tests.

use std::path::{Path, PathBuf};

use realmkeep::housing::{reconcile, Inventory, ItemCounts, Metadata};

/// Return the path to the static integration test fixture directory.
pub fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("test-data-int")
}

/// The sample metadata shipped with the tests.
#[allow(dead_code)]
pub fn sample_metadata() -> Metadata {
    let raw = std::fs::read_to_string(fixture_root().join("metadata.json")).expect("fixture");
    serde_json::from_str(&raw).expect("fixture metadata")
}

/// Parse metadata from a JSON value.
#[allow(dead_code)]
pub fn metadata(value: serde_json::Value) -> Metadata {
    serde_json::from_value(value).expect("metadata json")
}

/// A freshly synced inventory for `metadata`.
#[allow(dead_code)]
pub fn fresh_inventory(metadata: &Metadata) -> Inventory {
    let mut inventory = Inventory::default();
    reconcile(metadata, &mut inventory);
    inventory
}

#[allow(dead_code)]
pub fn counts(entries: &[(&str, u64)]) -> ItemCounts {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}
