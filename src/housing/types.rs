//! Core data structures for housing metadata and the user inventory.
//!
//! Metadata is produced once by the ingestion step and is read-only for the
//! rest of the crate. The inventory mirrors metadata by name and records what
//! the user owns. Both serialize to the JSON layout used on disk:
//!
//! ```text
//! metadata.json
//! { companions: [..], materials: [..],
//!   furnishings: { name: { cost?, materials? } },
//!   sets: { name: { cost?, mora?, furnishings: {name: count}, companions?: [..] } } }
//!
//! inventory.json
//! { companions: {name: bool}, materials: {name: int},
//!   furnishings: { name: { owned, blueprint?, crafted? } },
//!   sets: { name: { owned, companions?: {name: bool} } } }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Mora prices are stored in thousands.
pub const MORA_SCALE: u64 = 1000;

/// Material name to quantity.
pub type MaterialBill = BTreeMap<String, u64>;

/// Item (furnishing or set) name to count.
pub type ItemCounts = BTreeMap<String, u64>;

// ============================================================================
// Metadata
// ============================================================================

/// How a furnishing is acquired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFurnishing", into = "RawFurnishing")]
pub enum Furnishing {
    /// Has a crafting recipe. The optional cost buys the blueprint.
    Craftable {
        materials: MaterialBill,
        cost: Option<u64>,
    },
    /// Bought directly, one unit per purchase.
    Purchasable { cost: u64 },
    /// Rewarded by quests, trust rank or events.
    Other,
}

/// On-disk shape of a furnishing, where optional keys select the variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawFurnishing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cost: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    materials: Option<MaterialBill>,
}

impl From<RawFurnishing> for Furnishing {
    fn from(raw: RawFurnishing) -> Self {
        match (raw.materials, raw.cost) {
            (Some(materials), cost) => Furnishing::Craftable { materials, cost },
            (None, Some(cost)) => Furnishing::Purchasable { cost },
            (None, None) => Furnishing::Other,
        }
    }
}

impl From<Furnishing> for RawFurnishing {
    fn from(furnishing: Furnishing) -> Self {
        match furnishing {
            Furnishing::Craftable { materials, cost } => RawFurnishing {
                cost,
                materials: Some(materials),
            },
            Furnishing::Purchasable { cost } => RawFurnishing {
                cost: Some(cost),
                materials: None,
            },
            Furnishing::Other => RawFurnishing::default(),
        }
    }
}

impl Furnishing {
    pub fn is_craftable(&self) -> bool {
        matches!(self, Furnishing::Craftable { .. })
    }

    /// Crafting recipe for one unit; empty when the furnishing is never crafted.
    pub fn materials(&self) -> Option<&MaterialBill> {
        match self {
            Furnishing::Craftable { materials, .. } => Some(materials),
            _ => None,
        }
    }

    pub fn cost(&self) -> Option<u64> {
        match self {
            Furnishing::Craftable { cost, .. } => *cost,
            Furnishing::Purchasable { cost } => Some(*cost),
            Furnishing::Other => None,
        }
    }
}

/// A furnishing set, either a plain set or a gift set with companions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousingSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u64>,
    /// Price in thousands of mora.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mora: Option<u64>,
    #[serde(default)]
    pub furnishings: ItemCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub companions: Option<Vec<String>>,
}

impl HousingSet {
    pub fn is_gift_set(&self) -> bool {
        self.companions.is_some()
    }

    pub fn companions(&self) -> &[String] {
        self.companions.as_deref().unwrap_or(&[])
    }
}

/// Reference data for the whole housing system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub companions: Vec<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub furnishings: BTreeMap<String, Furnishing>,
    #[serde(default)]
    pub sets: BTreeMap<String, HousingSet>,
}

impl Metadata {
    /// Every companion name, including ones only a gift set mentions.
    pub fn companion_names(&self) -> BTreeSet<&str> {
        self.companions
            .iter()
            .chain(self.sets.values().flat_map(|set| set.companions()))
            .map(String::as_str)
            .collect()
    }
}

// ============================================================================
// Inventory
// ============================================================================

/// Ownership state of one furnishing.
///
/// `blueprint` and `crafted` are present only for craftable furnishings.
/// A crafted furnishing always has its blueprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnishingRecord {
    #[serde(default)]
    pub owned: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blueprint: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crafted: Option<bool>,
}

impl FurnishingRecord {
    /// Fresh record shaped for `furnishing`.
    pub fn for_furnishing(furnishing: &Furnishing) -> Self {
        if furnishing.is_craftable() {
            FurnishingRecord {
                owned: 0,
                blueprint: Some(false),
                crafted: Some(false),
            }
        } else {
            FurnishingRecord::default()
        }
    }

    pub fn has_blueprint(&self) -> bool {
        self.blueprint.unwrap_or(false)
    }

    pub fn is_crafted(&self) -> bool {
        self.crafted.unwrap_or(false)
    }
}

/// Ownership state of one set and, for gift sets, each companion's gift flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRecord {
    #[serde(default)]
    pub owned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub companions: Option<BTreeMap<String, bool>>,
}

impl SetRecord {
    pub fn for_set(set: &HousingSet) -> Self {
        SetRecord {
            owned: false,
            companions: set
                .companions
                .as_ref()
                .map(|names| names.iter().map(|n| (n.clone(), false)).collect()),
        }
    }

    pub fn is_gifted(&self, companion: &str) -> bool {
        self.companions
            .as_ref()
            .and_then(|c| c.get(companion).copied())
            .unwrap_or(false)
    }
}

/// The user's inventory, keyed by the same names as [`Metadata`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub companions: BTreeMap<String, bool>,
    #[serde(default)]
    pub materials: BTreeMap<String, u64>,
    #[serde(default)]
    pub furnishings: BTreeMap<String, FurnishingRecord>,
    #[serde(default)]
    pub sets: BTreeMap<String, SetRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn furnishing_variant_follows_optional_keys() {
        let craftable: Furnishing =
            serde_json::from_str(r#"{"cost": 40, "materials": {"Wood": 2}}"#).unwrap();
        assert!(craftable.is_craftable());
        assert_eq!(craftable.cost(), Some(40));

        let bought: Furnishing = serde_json::from_str(r#"{"cost": 100}"#).unwrap();
        assert_eq!(bought, Furnishing::Purchasable { cost: 100 });

        let reward: Furnishing = serde_json::from_str("{}").unwrap();
        assert_eq!(reward, Furnishing::Other);
        assert_eq!(reward.materials(), None);
    }

    #[test]
    fn companion_names_include_gift_set_companions() {
        let mut md = Metadata {
            companions: vec!["Paimon".to_string()],
            ..Metadata::default()
        };
        md.sets.insert(
            "Tea Room".into(),
            HousingSet {
                companions: Some(vec!["Paimon".to_string(), "Xiangling".to_string()]),
                ..HousingSet::default()
            },
        );
        let names: Vec<&str> = md.companion_names().into_iter().collect();
        assert_eq!(names, vec!["Paimon", "Xiangling"]);
    }

    #[test]
    fn furnishing_serializes_back_to_sparse_keys() {
        let json = serde_json::to_value(Furnishing::Purchasable { cost: 7 }).unwrap();
        assert_eq!(json, serde_json::json!({"cost": 7}));
        let json = serde_json::to_value(Furnishing::Other).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn fresh_records_match_metadata_shape() {
        let chair = Furnishing::Craftable {
            materials: MaterialBill::from([("Wood".to_string(), 2)]),
            cost: None,
        };
        let record = FurnishingRecord::for_furnishing(&chair);
        assert_eq!(record.blueprint, Some(false));
        assert_eq!(record.crafted, Some(false));

        let set = HousingSet {
            companions: Some(vec!["Paimon".to_string()]),
            ..HousingSet::default()
        };
        let record = SetRecord::for_set(&set);
        assert!(!record.owned);
        assert_eq!(record.companions.unwrap().get("Paimon"), Some(&false));
    }
}
