/// Plain-text rendering of analysis results for the terminal
use std::fmt::Write;

use super::analysis::{Analysis, DimensionReport};
use super::cost::{cost_of, CostKind, CostTotals};
use super::errors::{HousingError, HousingResult};
use super::recipe::{aggregate_materials, crafting_recipe, material_sort_key, merge_scaled, placing_recipe};
use super::types::{Furnishing, Inventory, ItemCounts, MaterialBill, Metadata};

const COLUMN: usize = 14;

fn legend<T>(report: &DimensionReport<T>) -> String {
    let mut out = String::from("  Legend:\n\n");
    for (label, text) in report.labels().iter().zip(report.legend()) {
        let _ = writeln!(out, "    {:<width$} = {}", label, text, width = COLUMN);
    }
    out
}

fn header<T>(first: &str, extra: &[&str], report: &DimensionReport<T>) -> String {
    let mut columns: Vec<String> = extra.iter().map(|c| format!("{:>width$}", c, width = COLUMN)).collect();
    columns.extend(report.labels().iter().map(|l| format!("{:>width$}", l, width = COLUMN)));
    format!(" | {:<26} | {} |\n", first, columns.join(" | "))
}

/// Material needs per milestone, next to what is in the inventory.
/// Shortfalls are marked with `!`.
pub fn render_materials(metadata: &Metadata, inventory: &Inventory, analysis: &Analysis) -> String {
    let report = &analysis.materials;
    let mut out = format!("Materials:\n\n{}\n", legend(report));
    out.push_str(&header("Material", &["owned"], report));

    let mut names: Vec<&String> = metadata.materials.iter().collect();
    names.sort_by(|a, b| material_sort_key(a).cmp(&material_sort_key(b)));
    for name in names {
        let owned = inventory.materials.get(name).copied().unwrap_or(0);
        let cells: Vec<String> = report
            .results
            .iter()
            .map(|r| {
                let required = r.totals.get(name).copied().unwrap_or(0);
                let mark = if owned >= required { ' ' } else { '!' };
                format!("{:>width$}{}", required, mark, width = COLUMN - 1)
            })
            .collect();
        let _ = writeln!(out, " | {:<26} | {:>width$} | {} |", name, owned, cells.join(" | "), width = COLUMN);
    }
    out
}

/// Realm currency and mora needed per milestone.
pub fn render_currency(analysis: &Analysis) -> String {
    let report = &analysis.currency;
    let mut out = format!("Currency:\n\n{}\n", legend(report));
    out.push_str(&header("Type", &[], report));
    for kind in CostKind::ALL {
        let cells: Vec<String> = report
            .results
            .iter()
            .map(|r| format!("{:>width$}", r.totals.get(&kind).copied().unwrap_or(0), width = COLUMN))
            .collect();
        let _ = writeln!(out, " | {:<26} | {} |", kind.to_string(), cells.join(" | "));
    }
    out
}

/// Outstanding furnishings, craftable ones with an owned blueprint first.
pub fn render_furnishings(metadata: &Metadata, inventory: &Inventory, analysis: &Analysis) -> String {
    let mut rows: Vec<(&String, &u64)> = analysis.furnishings.iter().collect();
    rows.sort_by_key(|(name, missing)| {
        let record = inventory.furnishings.get(*name).cloned().unwrap_or_default();
        let purchasable = metadata
            .furnishings
            .get(*name)
            .and_then(Furnishing::cost)
            .is_some();
        // Fraction owned in permille; sort key only, so saturation is harmless
        let progress = record.owned.saturating_mul(1000) / record.owned.saturating_add(**missing).max(1);
        (
            record.blueprint.is_none(),
            record.is_crafted(),
            !record.has_blueprint(),
            !purchasable,
            std::cmp::Reverse(progress),
            (*name).clone(),
        )
    });

    let mut out = String::from(
        "Furnishings:\n\n  Legend:\n\n    $ = can be bought\n    ~ = rewarded by quests, trust rank or events\n    bp/cr = blueprint owned / crafted at least once\n\n",
    );
    for (name, missing) in rows {
        let record = inventory.furnishings.get(name).cloned().unwrap_or_default();
        let furnishing = metadata.furnishings.get(name);
        let source = if furnishing.and_then(Furnishing::cost).is_some() { '$' } else { '~' };
        let flags = match record.blueprint {
            Some(bp) => format!("bp{} cr{}", yes_no(bp), yes_no(record.is_crafted())),
            None => " ".repeat(9),
        };
        let _ = writeln!(
            out,
            "  {} {}  ({:>2}/{:>2})  {}",
            source,
            flags,
            record.owned,
            record.owned.saturating_add(*missing),
            name
        );
    }
    out
}

/// Incomplete sets, gift sets first.
pub fn render_sets(metadata: &Metadata, inventory: &Inventory, analysis: &Analysis) -> String {
    let mut names: Vec<&String> = analysis.sets.keys().collect();
    names.sort_by_key(|name| {
        let gift = metadata.sets.get(*name).map(|s| s.is_gift_set()).unwrap_or(false);
        let owned = inventory.sets.get(*name).map(|s| s.owned).unwrap_or(false);
        (!gift, owned, (*name).clone())
    });

    let mut out = String::from("Sets:\n\n  Legend:\n\n    G = gift set\n    H = furnishing set\n\n");
    for name in names {
        let gift = metadata.sets.get(name).map(|s| s.is_gift_set()).unwrap_or(false);
        let owned = inventory.sets.get(name).map(|s| s.owned).unwrap_or(false);
        let _ = writeln!(out, "  {}{}  {}", if gift { 'G' } else { 'H' }, yes_no(owned), name);
    }
    out
}

/// Furnishings, materials and cost still needed to finish one set.
pub fn render_set_detail(
    metadata: &Metadata,
    inventory: &Inventory,
    analysis: &Analysis,
    set_name: &str,
) -> HousingResult<String> {
    if !metadata.sets.contains_key(set_name) {
        return Err(HousingError::unknown("set", set_name));
    }
    let Some(missing) = analysis.sets.get(set_name) else {
        return Ok(format!("{}:\n\n  complete\n", set_name));
    };

    let furnishings: ItemCounts = missing
        .iter()
        .filter(|(name, _)| name.as_str() != set_name)
        .map(|(name, count)| (name.clone(), *count))
        .collect();

    let mut out = format!("{}:\n", set_name);
    if !furnishings.is_empty() {
        push_section(&mut out, "Furnishings", &placing_recipe(&furnishings));
    }
    let materials = aggregate_materials(metadata, &furnishings)?;
    push_section(&mut out, "Materials", &crafting_recipe(&materials));
    push_section(&mut out, "Cost", &cost_lines(&cost_of(metadata, inventory, missing)?));
    Ok(out)
}

/// Materials and cost for `count` more of one furnishing.
pub fn render_furnishing_detail(
    metadata: &Metadata,
    inventory: &Inventory,
    name: &str,
    count: u64,
) -> HousingResult<String> {
    let furnishing = metadata
        .furnishings
        .get(name)
        .ok_or_else(|| HousingError::unknown("furnishing", name))?;

    let mut out = format!("{}:\n\n {:>4}×  wanted\n", name, count);
    if let Some(recipe) = furnishing.materials() {
        let mut materials = MaterialBill::new();
        merge_scaled(&mut materials, recipe, count)?;
        push_section(&mut out, "Materials", &crafting_recipe(&materials));
    }
    let wanted = ItemCounts::from([(name.to_string(), count)]);
    push_section(&mut out, "Cost", &cost_lines(&cost_of(metadata, inventory, &wanted)?));
    Ok(out)
}

fn cost_lines(totals: &CostTotals) -> Vec<String> {
    totals
        .iter()
        .map(|(kind, amount)| format!("{:>6}×  {}", amount, kind))
        .collect()
}

fn push_section(out: &mut String, title: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n {}:\n", title);
    for line in lines {
        let _ = writeln!(out, "  {}", line);
    }
}

fn yes_no(flag: bool) -> char {
    if flag {
        '+'
    } else {
        '-'
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::housing::analysis::analyze;
    use crate::housing::sync::reconcile;
    use crate::housing::types::HousingSet;

    fn fixture() -> (Metadata, Inventory) {
        let mut md = Metadata {
            materials: vec!["Pine Wood".into()],
            ..Metadata::default()
        };
        md.furnishings.insert(
            "Chair".into(),
            Furnishing::Craftable {
                materials: MaterialBill::from([("Pine Wood".to_string(), 2)]),
                cost: Some(50),
            },
        );
        md.furnishings.insert("Lantern".into(), Furnishing::Purchasable { cost: 100 });
        md.sets.insert(
            "Porch".into(),
            HousingSet {
                mora: Some(20),
                furnishings: [("Chair".to_string(), 2), ("Lantern".to_string(), 1)].into(),
                ..HousingSet::default()
            },
        );
        let mut inv = Inventory::default();
        reconcile(&md, &mut inv);
        (md, inv)
    }

    #[test]
    fn set_detail_lists_furnishings_materials_and_cost() {
        let (md, inv) = fixture();
        let analysis = analyze(&md, &inv).unwrap();
        let text = render_set_detail(&md, &inv, &analysis, "Porch").unwrap();
        assert!(text.contains("     2×  Chair"));
        assert!(text.contains("     4×  Pine Wood"));
        assert!(text.contains("   150×  currency"));
        assert!(text.contains(" 20000×  mora"));
    }

    #[test]
    fn complete_set_says_so() {
        let (md, mut inv) = fixture();
        inv.set_set_owned("Porch", true).unwrap();
        inv.set_furnishing_owned("Chair", 2).unwrap();
        inv.set_furnishing_owned("Lantern", 1).unwrap();
        let analysis = analyze(&md, &inv).unwrap();
        let text = render_set_detail(&md, &inv, &analysis, "Porch").unwrap();
        assert!(text.contains("complete"));
    }

    #[test]
    fn materials_table_marks_shortfalls() {
        let (md, inv) = fixture();
        let analysis = analyze(&md, &inv).unwrap();
        let text = render_materials(&md, &inv, &analysis);
        assert!(text.contains("Pine Wood"));
        assert!(text.contains("4!"));
    }

    #[test]
    fn furnishing_detail_scales_recipe() {
        let (md, inv) = fixture();
        let text = render_furnishing_detail(&md, &inv, "Chair", 3).unwrap();
        assert!(text.contains("     6×  Pine Wood"));
        assert!(text.contains("    50×  currency"));
        assert!(render_furnishing_detail(&md, &inv, "Sofa", 1).is_err());
    }
}
