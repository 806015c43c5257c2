//! Gap analysis between the inventory and the full housing metadata.
//!
//! The analyzer classifies every missing furnishing and set into seven fixed
//! milestones, once for materials and once for currency:
//!
//! | # | Materials | Currency |
//! |---|-----------|----------|
//! | 0 | uncrafted furnishings whose blueprint is owned | missing furnishing blueprints |
//! | 1 | every uncrafted furnishing | missing gift set blueprints with a gifting companion |
//! | 2 | gift sets with a gifting companion, set owned | same, as items to buy |
//! | 3 | gift sets with a gifting companion | same, as items to buy |
//! | 4 | sets whose blueprint is owned | missing set blueprints |
//! | 5 | every set | every set, as items to buy |
//! | 6 | union of the above | union of the above plus one of every unowned furnishing |
//!
//! Each milestone first collects item counts, then rolls them up into a
//! material bill or a cost total. Set requirements merge with greater-of, so a
//! furnishing needed by several sets counts its largest shortfall once.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::cost::{cost_of, CostTotals};
use super::errors::{HousingError, HousingResult};
use super::recipe::aggregate_materials;
use super::types::{
    Furnishing, FurnishingRecord, HousingSet, Inventory, ItemCounts, MaterialBill, Metadata,
    SetRecord,
};

// ============================================================================
// Milestones
// ============================================================================

/// Which resource a milestone is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Materials,
    Currency,
}

/// The seven fixed classification rules.
///
/// Variant names follow the materials reading; see [`Milestone::legend`] for
/// what each one counts in the currency dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    /// Materials: uncrafted furnishings with an owned blueprint.
    /// Currency: missing furnishing blueprints.
    BlueprintOwnedUncrafted,
    /// Materials: every uncrafted furnishing.
    /// Currency: missing blueprints of gift sets with a gifting companion.
    AllUncrafted,
    /// Materials and currency: shortfalls of owned gift sets with a gifting companion.
    GiftSetOwned,
    /// Materials and currency: shortfalls of gift sets with a gifting companion.
    GiftAny,
    /// Materials: shortfalls of owned sets.
    /// Currency: missing set blueprints.
    SetOwned,
    /// Materials and currency: shortfalls of every set.
    AnySet,
    /// Everything above, plus one of each unowned furnishing in currency.
    Union,
}

impl Milestone {
    pub const ALL: [Milestone; 7] = [
        Milestone::BlueprintOwnedUncrafted,
        Milestone::AllUncrafted,
        Milestone::GiftSetOwned,
        Milestone::GiftAny,
        Milestone::SetOwned,
        Milestone::AnySet,
        Milestone::Union,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Short column header.
    pub fn label(self, dimension: Dimension) -> &'static str {
        match (dimension, self) {
            (Dimension::Materials, Milestone::BlueprintOwnedUncrafted) => "bp+ uncrafted",
            (Dimension::Materials, Milestone::AllUncrafted) => "uncrafted",
            (Dimension::Materials, Milestone::GiftSetOwned) => "gift bp+",
            (Dimension::Materials, Milestone::GiftAny) => "gift",
            (Dimension::Materials, Milestone::SetOwned) => "set bp+",
            (Dimension::Materials, Milestone::AnySet) => "set",
            (Dimension::Materials, Milestone::Union) => "all",
            (Dimension::Currency, Milestone::BlueprintOwnedUncrafted) => "furn bp-",
            (Dimension::Currency, Milestone::AllUncrafted) => "gift bp-",
            (Dimension::Currency, Milestone::GiftSetOwned) => "gift bp+ furn-",
            (Dimension::Currency, Milestone::GiftAny) => "gift furn-",
            (Dimension::Currency, Milestone::SetOwned) => "set bp-",
            (Dimension::Currency, Milestone::AnySet) => "set furn-",
            (Dimension::Currency, Milestone::Union) => "all",
        }
    }

    /// Full description of what the milestone counts.
    pub fn legend(self, dimension: Dimension) -> &'static str {
        match (dimension, self) {
            (Dimension::Materials, Milestone::BlueprintOwnedUncrafted) => {
                "one of each furnishing whose blueprint is owned and that hasn't been crafted yet"
            }
            (Dimension::Materials, Milestone::AllUncrafted) => {
                "one of each furnishing that hasn't been crafted yet"
            }
            (Dimension::Materials, Milestone::GiftSetOwned) => {
                "largest missing count of each furnishing over gift sets that are owned and have a gifting companion"
            }
            (Dimension::Materials, Milestone::GiftAny) => {
                "largest missing count of each furnishing over gift sets that have a gifting companion"
            }
            (Dimension::Materials, Milestone::SetOwned) => {
                "largest missing count of each furnishing over sets that are owned"
            }
            (Dimension::Materials, Milestone::AnySet) => {
                "largest missing count of each furnishing over all sets"
            }
            (Dimension::Materials, Milestone::Union) => {
                "larger of the largest missing count over all sets and one of each uncrafted furnishing"
            }
            (Dimension::Currency, Milestone::BlueprintOwnedUncrafted) => {
                "all missing furnishing blueprints"
            }
            (Dimension::Currency, Milestone::AllUncrafted) => {
                "all missing blueprints for gift sets that have a gifting companion"
            }
            (Dimension::Currency, Milestone::GiftSetOwned) => {
                "all missing furnishings and their blueprints for owned gift sets that have a gifting companion"
            }
            (Dimension::Currency, Milestone::GiftAny) => {
                "all missing furnishings and their blueprints for gift sets that have a gifting companion"
            }
            (Dimension::Currency, Milestone::SetOwned) => "all missing set blueprints",
            (Dimension::Currency, Milestone::AnySet) => {
                "all missing furnishings and their blueprints for all sets"
            }
            (Dimension::Currency, Milestone::Union) => {
                "all missing blueprints, all missing set furnishings and one of every other unowned furnishing"
            }
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// One milestone: the missing items and what they add up to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneResult<T> {
    pub items: ItemCounts,
    pub totals: T,
}

/// The seven milestones of one dimension, indexed by [`Milestone::index`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionReport<T> {
    pub dimension: Dimension,
    pub results: Vec<MilestoneResult<T>>,
}

impl<T> DimensionReport<T> {
    pub fn get(&self, milestone: Milestone) -> &MilestoneResult<T> {
        &self.results[milestone.index()]
    }

    pub fn labels(&self) -> Vec<&'static str> {
        Milestone::ALL.iter().map(|m| m.label(self.dimension)).collect()
    }

    pub fn legend(&self) -> Vec<&'static str> {
        Milestone::ALL.iter().map(|m| m.legend(self.dimension)).collect()
    }
}

/// Result of [`analyze`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub materials: DimensionReport<MaterialBill>,
    pub currency: DimensionReport<CostTotals>,
    /// Largest outstanding count per furnishing.
    pub furnishings: ItemCounts,
    /// Missing items per set, including the set itself when its blueprint is missing.
    pub sets: BTreeMap<String, ItemCounts>,
}

// ============================================================================
// Buckets
// ============================================================================

type Buckets = [ItemCounts; 7];

/// Keeps the larger of the stored and the new count.
fn record_greater(bucket: &mut ItemCounts, name: &str, count: u64) {
    let entry = bucket.entry(name.to_string()).or_insert(0);
    if count > *entry {
        *entry = count;
    }
}

/// Marks an item as needed once.
fn record_flag(bucket: &mut ItemCounts, name: &str) {
    record_greater(bucket, name, 1);
}

/// Records a set shortfall in a currency bucket.
///
/// Purchasable furnishings are bought per unit, craftable ones only need their
/// blueprint, and an owned blueprint leaves nothing to buy.
fn record_purchase(bucket: &mut ItemCounts, name: &str, missing: u64, blueprint: Option<bool>) {
    match blueprint {
        None => record_greater(bucket, name, missing),
        Some(false) => record_flag(bucket, name),
        Some(true) => {}
    }
}

struct Collector {
    materials: Buckets,
    currency: Buckets,
    furnishings: ItemCounts,
    sets: BTreeMap<String, ItemCounts>,
}

impl Collector {
    fn new() -> Self {
        Collector {
            materials: Default::default(),
            currency: Default::default(),
            furnishings: ItemCounts::new(),
            sets: BTreeMap::new(),
        }
    }

    fn material(&mut self, milestone: Milestone) -> &mut ItemCounts {
        &mut self.materials[milestone.index()]
    }

    fn currency(&mut self, milestone: Milestone) -> &mut ItemCounts {
        &mut self.currency[milestone.index()]
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// Compares `inventory` against `metadata` and fills every milestone.
///
/// Pure: neither input is modified. Every name in metadata must have an
/// inventory record (see [`super::sync::reconcile`]); a missing one fails with
/// [`HousingError::IncompleteInventory`].
pub fn analyze(metadata: &Metadata, inventory: &Inventory) -> HousingResult<Analysis> {
    let mut collector = Collector::new();

    for (name, furnishing) in &metadata.furnishings {
        let record = furnishing_record(inventory, name)?;
        classify_furnishing(&mut collector, name, furnishing, record)?;
    }

    for (name, set) in &metadata.sets {
        let record = inventory
            .sets
            .get(name)
            .ok_or_else(|| HousingError::incomplete("set", name))?;
        classify_set(&mut collector, metadata, inventory, name, set, record)?;
    }

    debug!(
        "Gap analysis collected {} furnishings across {} incomplete sets",
        collector.furnishings.len(),
        collector.sets.len()
    );

    let materials = collector
        .materials
        .into_iter()
        .map(|items| -> HousingResult<MilestoneResult<MaterialBill>> {
            let totals = aggregate_materials(metadata, &items)?;
            Ok(MilestoneResult { items, totals })
        })
        .collect::<HousingResult<Vec<_>>>()?;

    let currency = collector
        .currency
        .into_iter()
        .map(|items| -> HousingResult<MilestoneResult<CostTotals>> {
            let totals = cost_of(metadata, inventory, &items)?;
            Ok(MilestoneResult { items, totals })
        })
        .collect::<HousingResult<Vec<_>>>()?;

    Ok(Analysis {
        materials: DimensionReport {
            dimension: Dimension::Materials,
            results: materials,
        },
        currency: DimensionReport {
            dimension: Dimension::Currency,
            results: currency,
        },
        furnishings: collector.furnishings,
        sets: collector.sets,
    })
}

fn furnishing_record<'a>(inventory: &'a Inventory, name: &str) -> HousingResult<&'a FurnishingRecord> {
    inventory
        .furnishings
        .get(name)
        .ok_or_else(|| HousingError::incomplete("furnishing", name))
}

/// Blueprint state of a furnishing: `None` when it is not craftable.
fn blueprint_state(furnishing: &Furnishing, record: &FurnishingRecord, name: &str) -> HousingResult<Option<bool>> {
    if !furnishing.is_craftable() {
        return Ok(None);
    }
    record
        .blueprint
        .map(Some)
        .ok_or_else(|| HousingError::incomplete("blueprint", name))
}

/// First pass: one of each uncrafted or unowned furnishing.
fn classify_furnishing(
    collector: &mut Collector,
    name: &str,
    furnishing: &Furnishing,
    record: &FurnishingRecord,
) -> HousingResult<()> {
    match blueprint_state(furnishing, record, name)? {
        Some(blueprint) => {
            let crafted = record
                .crafted
                .ok_or_else(|| HousingError::incomplete("crafted", name))?;
            if crafted {
                return Ok(());
            }
            record_flag(collector.material(Milestone::AllUncrafted), name);
            record_flag(collector.material(Milestone::Union), name);
            if blueprint {
                record_flag(collector.material(Milestone::BlueprintOwnedUncrafted), name);
            } else {
                record_flag(collector.currency(Milestone::BlueprintOwnedUncrafted), name);
                record_flag(collector.currency(Milestone::Union), name);
            }
            record_flag(&mut collector.furnishings, name);
        }
        None if record.owned == 0 => {
            record_flag(collector.currency(Milestone::Union), name);
            record_flag(&mut collector.furnishings, name);
        }
        None => {}
    }
    Ok(())
}

/// A gift set is active while at least one owned companion hasn't received it.
fn has_gifting_companions(inventory: &Inventory, set_name: &str, set: &HousingSet, record: &SetRecord) -> HousingResult<bool> {
    if !set.is_gift_set() {
        return Ok(false);
    }
    let gifted = record
        .companions
        .as_ref()
        .ok_or_else(|| HousingError::incomplete("set companions", set_name))?;
    for companion in set.companions() {
        let owned = *inventory
            .companions
            .get(companion)
            .ok_or_else(|| HousingError::incomplete("companion", companion))?;
        if !owned {
            continue;
        }
        let done = *gifted
            .get(companion)
            .ok_or_else(|| HousingError::incomplete("gift", companion))?;
        if !done {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Second pass: the set blueprint and every furnishing shortfall of one set.
fn classify_set(
    collector: &mut Collector,
    metadata: &Metadata,
    inventory: &Inventory,
    set_name: &str,
    set: &HousingSet,
    record: &SetRecord,
) -> HousingResult<()> {
    let set_owned = record.owned;
    let gifting = has_gifting_companions(inventory, set_name, set, record)?;
    let mut missing_items = ItemCounts::new();

    // Set blueprint: currency buckets 4 and 6, plus 1 for an active gift set
    if !set_owned {
        record_flag(collector.currency(Milestone::SetOwned), set_name);
        record_flag(collector.currency(Milestone::Union), set_name);
        record_flag(&mut missing_items, set_name);
        if gifting {
            record_flag(collector.currency(Milestone::AllUncrafted), set_name);
        }
    }

    for (name, required) in &set.furnishings {
        let furnishing = metadata
            .furnishings
            .get(name)
            .ok_or_else(|| HousingError::unknown("furnishing", name))?;
        let item = furnishing_record(inventory, name)?;
        if item.owned >= *required {
            continue;
        }
        let missing = required - item.owned;
        let blueprint = blueprint_state(furnishing, item, name)?;

        record_greater(collector.material(Milestone::AnySet), name, missing);
        record_greater(collector.material(Milestone::Union), name, missing);
        record_greater(&mut collector.furnishings, name, missing);
        record_greater(&mut missing_items, name, missing);

        record_purchase(collector.currency(Milestone::AnySet), name, missing, blueprint);
        if blueprint.is_none() {
            record_greater(collector.currency(Milestone::Union), name, missing);
        }

        if gifting {
            record_greater(collector.material(Milestone::GiftAny), name, missing);
            record_purchase(collector.currency(Milestone::GiftAny), name, missing, blueprint);
            if set_owned {
                record_greater(collector.material(Milestone::GiftSetOwned), name, missing);
                record_purchase(collector.currency(Milestone::GiftSetOwned), name, missing, blueprint);
            }
        }

        if set_owned {
            record_greater(collector.material(Milestone::SetOwned), name, missing);
        }
    }

    if !missing_items.is_empty() {
        collector.sets.insert(set_name.to_string(), missing_items);
    }
    Ok(())
}
