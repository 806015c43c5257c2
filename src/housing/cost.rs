/// Currency and mora cost of acquiring missing furnishings and sets
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::errors::{HousingError, HousingResult};
use super::types::{Furnishing, Inventory, ItemCounts, Metadata, MORA_SCALE};

/// The two ways an item is paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostKind {
    /// Realm currency.
    #[serde(rename = "currency")]
    Realm,
    Mora,
}

impl CostKind {
    pub const ALL: [CostKind; 2] = [CostKind::Realm, CostKind::Mora];
}

impl fmt::Display for CostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostKind::Realm => write!(f, "currency"),
            CostKind::Mora => write!(f, "mora"),
        }
    }
}

pub type CostTotals = BTreeMap<CostKind, u64>;

/// Cost of acquiring `required_count` of each named furnishing or set.
///
/// - Craftable furnishings cost their blueprint price once, and only while the
///   blueprint is not owned.
/// - Purchasable furnishings cost their price per unit.
/// - Sets cost their realm currency price, else their mora price, once.
///
/// Kinds that nothing contributes to are left out of the result.
pub fn cost_of(metadata: &Metadata, inventory: &Inventory, items: &ItemCounts) -> HousingResult<CostTotals> {
    let mut totals = CostTotals::new();
    for (name, required) in items {
        if let Some((kind, amount)) = item_cost(metadata, inventory, name, *required)? {
            if amount > 0 {
                let total = totals.entry(kind).or_insert(0);
                *total = total
                    .checked_add(amount)
                    .ok_or_else(|| HousingError::overflow(&kind.to_string()))?;
            }
        }
    }
    Ok(totals)
}

fn item_cost(
    metadata: &Metadata,
    inventory: &Inventory,
    name: &str,
    required: u64,
) -> HousingResult<Option<(CostKind, u64)>> {
    if let Some(furnishing) = metadata.furnishings.get(name) {
        let amount = match furnishing {
            Furnishing::Craftable { cost: Some(cost), .. } => {
                let record = inventory
                    .furnishings
                    .get(name)
                    .ok_or_else(|| HousingError::incomplete("furnishing", name))?;
                if record.has_blueprint() {
                    0
                } else {
                    *cost
                }
            }
            Furnishing::Purchasable { cost } => cost
                .checked_mul(required)
                .ok_or_else(|| HousingError::overflow(name))?,
            Furnishing::Craftable { cost: None, .. } | Furnishing::Other => return Ok(None),
        };
        return Ok(Some((CostKind::Realm, amount)));
    }

    if let Some(set) = metadata.sets.get(name) {
        return Ok(match (set.cost, set.mora) {
            (Some(cost), _) => Some((CostKind::Realm, cost)),
            (None, Some(mora)) => Some((
                CostKind::Mora,
                mora.checked_mul(MORA_SCALE)
                    .ok_or_else(|| HousingError::overflow(name))?,
            )),
            (None, None) => None,
        });
    }

    Err(HousingError::unknown("item", name))
}
