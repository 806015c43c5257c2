/// Bill-of-materials rollup for furnishings and sets
use super::errors::{HousingError, HousingResult};
use super::types::{ItemCounts, MaterialBill, Metadata};

// ============================================================================
// Aggregation
// ============================================================================

/// Total materials needed to craft `count` of each requested furnishing.
///
/// Furnishings without a recipe contribute nothing. Overlapping materials are
/// summed, so the result does not depend on iteration order.
pub fn aggregate_materials(metadata: &Metadata, requests: &ItemCounts) -> HousingResult<MaterialBill> {
    let mut totals = MaterialBill::new();
    for (name, count) in requests {
        let furnishing = metadata
            .furnishings
            .get(name)
            .ok_or_else(|| HousingError::unknown("furnishing", name))?;
        if let Some(materials) = furnishing.materials() {
            merge_scaled(&mut totals, materials, *count)?;
        }
    }
    Ok(totals)
}

/// Total materials needed to craft every furnishing a set requires.
pub fn aggregate_materials_for_set(metadata: &Metadata, set_name: &str) -> HousingResult<MaterialBill> {
    let set = metadata
        .sets
        .get(set_name)
        .ok_or_else(|| HousingError::unknown("set", set_name))?;
    aggregate_materials(metadata, &set.furnishings)
}

/// Adds `bill × factor` into `totals`, failing instead of wrapping.
pub fn merge_scaled(totals: &mut MaterialBill, bill: &MaterialBill, factor: u64) -> HousingResult<()> {
    for (material, quantity) in bill {
        let entry = totals.entry(material.clone()).or_insert(0);
        let current = *entry;
        *entry = quantity
            .checked_mul(factor)
            .and_then(|scaled| current.checked_add(scaled))
            .ok_or_else(|| HousingError::overflow(material))?;
    }
    Ok(())
}

// ============================================================================
// Display Formatting
// ============================================================================

/// Materials sort by their last word so grades of one material line up
/// ("Fragrant Cedar Wood" next to "Pine Wood").
pub fn material_sort_key(name: &str) -> (&str, &str) {
    (name.split_whitespace().last().unwrap_or(name), name)
}

/// One line per material, e.g. `    12×  Pine Wood`.
pub fn crafting_recipe(materials: &MaterialBill) -> Vec<String> {
    let mut entries: Vec<(&String, &u64)> = materials.iter().collect();
    entries.sort_by(|a, b| material_sort_key(a.0).cmp(&material_sort_key(b.0)));
    entries
        .into_iter()
        .map(|(name, count)| format!("{:>6}×  {}", count, name))
        .collect()
}

/// One line per furnishing to place, in name order.
pub fn placing_recipe(furnishings: &ItemCounts) -> Vec<String> {
    furnishings
        .iter()
        .map(|(name, count)| format!("{:>6}×  {}", count, name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::housing::types::{Furnishing, HousingSet};

    fn bill(entries: &[(&str, u64)]) -> MaterialBill {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn metadata() -> Metadata {
        let mut md = Metadata::default();
        md.furnishings.insert(
            "Chair".into(),
            Furnishing::Craftable {
                materials: bill(&[("Pine Wood", 2), ("Iron Chunk", 1)]),
                cost: None,
            },
        );
        md.furnishings.insert(
            "Table".into(),
            Furnishing::Craftable {
                materials: bill(&[("Pine Wood", 4)]),
                cost: Some(300),
            },
        );
        md.furnishings.insert("Lantern".into(), Furnishing::Purchasable { cost: 100 });
        md.sets.insert(
            "Dining".into(),
            HousingSet {
                furnishings: bill(&[("Chair", 4), ("Table", 1), ("Lantern", 2)]),
                ..HousingSet::default()
            },
        );
        md
    }

    #[test]
    fn scales_and_merges_overlapping_materials() {
        let md = metadata();
        let totals = aggregate_materials(&md, &bill(&[("Chair", 3), ("Table", 2)])).unwrap();
        assert_eq!(totals, bill(&[("Pine Wood", 14), ("Iron Chunk", 3)]));
    }

    #[test]
    fn aggregation_is_additive() {
        let md = metadata();
        let both = aggregate_materials(&md, &bill(&[("Chair", 1), ("Table", 1)])).unwrap();
        let mut summed = aggregate_materials(&md, &bill(&[("Chair", 1)])).unwrap();
        for (k, v) in aggregate_materials(&md, &bill(&[("Table", 1)])).unwrap() {
            *summed.entry(k).or_insert(0) += v;
        }
        assert_eq!(both, summed);
    }

    #[test]
    fn empty_and_uncraftable_requests_yield_nothing() {
        let md = metadata();
        assert!(aggregate_materials(&md, &ItemCounts::new()).unwrap().is_empty());
        assert!(aggregate_materials(&md, &bill(&[("Lantern", 5)])).unwrap().is_empty());
    }

    #[test]
    fn unknown_furnishing_is_an_error() {
        let md = metadata();
        let err = aggregate_materials(&md, &bill(&[("Throne", 1)])).unwrap_err();
        assert_eq!(err, HousingError::unknown("furnishing", "Throne"));
    }

    #[test]
    fn oversized_quantities_fail_instead_of_wrapping() {
        let mut md = metadata();
        md.furnishings.insert(
            "Pillar".into(),
            Furnishing::Craftable {
                materials: bill(&[("Pine Wood", 10_000_000_000_000_000_000)]),
                cost: None,
            },
        );
        assert_eq!(
            aggregate_materials(&md, &bill(&[("Pillar", 2)])),
            Err(HousingError::Overflow("Pine Wood".to_string()))
        );
        // Each term fits but the sum does not
        assert!(aggregate_materials(&md, &bill(&[("Pillar", 1), ("Table", u64::MAX / 4)])).is_err());
        assert!(aggregate_materials(&md, &bill(&[("Pillar", 1)])).is_ok());
    }

    #[test]
    fn set_rollup_uses_required_counts() {
        let md = metadata();
        let totals = aggregate_materials_for_set(&md, "Dining").unwrap();
        assert_eq!(totals, bill(&[("Pine Wood", 12), ("Iron Chunk", 4)]));
    }

    #[test]
    fn recipe_lines_sort_by_last_word() {
        let lines = crafting_recipe(&bill(&[("Pine Wood", 12), ("Iron Chunk", 3), ("Birch Wood", 1)]));
        assert_eq!(
            lines,
            vec!["     3×  Iron Chunk", "     1×  Birch Wood", "    12×  Pine Wood"]
        );
    }
}
