//! Inventory sync: bring the inventory's shape in line with metadata.
//!
//! New metadata entries get a default record. Records that predate a shape
//! change (a furnishing that gained a recipe, a set that gained companions)
//! get the missing fields. Existing values are never changed, and records
//! whose names disappeared from metadata are left in place.

use log::{debug, info};

use super::types::{FurnishingRecord, Inventory, Metadata, SetRecord};

/// Adds every record `metadata` implies but `inventory` lacks.
///
/// Returns whether anything was added, so the caller knows to persist.
/// Running it again without a metadata change returns `false`.
pub fn reconcile(metadata: &Metadata, inventory: &mut Inventory) -> bool {
    let mut added = 0usize;

    for name in metadata.companion_names() {
        if !inventory.companions.contains_key(name) {
            inventory.companions.insert(name.to_string(), false);
            added += 1;
        }
    }

    for name in &metadata.materials {
        if !inventory.materials.contains_key(name) {
            inventory.materials.insert(name.clone(), 0);
            added += 1;
        }
    }

    for (name, furnishing) in &metadata.furnishings {
        match inventory.furnishings.get_mut(name) {
            None => {
                inventory
                    .furnishings
                    .insert(name.clone(), FurnishingRecord::for_furnishing(furnishing));
                added += 1;
            }
            Some(record) if furnishing.is_craftable() => {
                if record.blueprint.is_none() {
                    debug!("Adding blueprint flag to '{}'", name);
                    record.blueprint = Some(false);
                    added += 1;
                }
                if record.crafted.is_none() {
                    debug!("Adding crafted flag to '{}'", name);
                    record.crafted = Some(false);
                    added += 1;
                }
            }
            Some(_) => {}
        }
    }

    for (name, set) in &metadata.sets {
        match inventory.sets.get_mut(name) {
            None => {
                inventory.sets.insert(name.clone(), SetRecord::for_set(set));
                added += 1;
            }
            Some(record) if set.is_gift_set() => {
                let gifted = record.companions.get_or_insert_with(Default::default);
                for companion in set.companions() {
                    if !gifted.contains_key(companion) {
                        debug!("Adding gift flag for '{}' to set '{}'", companion, name);
                        gifted.insert(companion.clone(), false);
                        added += 1;
                    }
                }
            }
            Some(_) => {}
        }
    }

    if added > 0 {
        info!("Inventory sync added {} records", added);
    }
    added > 0
}
