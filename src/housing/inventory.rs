/// Inventory record changes and invariant checks
///
/// All user edits go through these methods so the inventory never holds a
/// crafted furnishing without its blueprint, or a gift flag on a set that is
/// not owned.
use log::info;

use super::errors::{HousingError, HousingResult};
use super::types::{FurnishingRecord, Inventory, Metadata};

impl Inventory {
    // ========================================================================
    // Companions and materials
    // ========================================================================

    /// Un-owning a companion clears its gift flag on every set.
    pub fn set_companion_owned(&mut self, name: &str, owned: bool) -> HousingResult<()> {
        let entry = self
            .companions
            .get_mut(name)
            .ok_or_else(|| HousingError::incomplete("companion", name))?;
        *entry = owned;
        if !owned {
            for record in self.sets.values_mut() {
                if let Some(gifted) = record.companions.as_mut() {
                    if let Some(flag) = gifted.get_mut(name) {
                        *flag = false;
                    }
                }
            }
        }
        info!("Companion '{}' owned = {}", name, owned);
        Ok(())
    }

    pub fn set_material_count(&mut self, name: &str, count: u64) -> HousingResult<()> {
        let entry = self
            .materials
            .get_mut(name)
            .ok_or_else(|| HousingError::incomplete("material", name))?;
        *entry = count;
        Ok(())
    }

    // ========================================================================
    // Furnishings
    // ========================================================================

    fn furnishing_mut(&mut self, name: &str) -> HousingResult<&mut FurnishingRecord> {
        self.furnishings
            .get_mut(name)
            .ok_or_else(|| HousingError::incomplete("furnishing", name))
    }

    pub fn set_furnishing_owned(&mut self, name: &str, count: u64) -> HousingResult<()> {
        self.furnishing_mut(name)?.owned = count;
        Ok(())
    }

    /// Rejects clearing the blueprint of a crafted furnishing.
    pub fn set_blueprint(&mut self, name: &str, owned: bool) -> HousingResult<()> {
        let record = self.furnishing_mut(name)?;
        if record.blueprint.is_none() {
            return Err(HousingError::InvalidRecord(format!("'{}' has no blueprint", name)));
        }
        if !owned && record.is_crafted() {
            return Err(HousingError::InvalidRecord(format!(
                "cannot clear the blueprint of '{}' while it is crafted",
                name
            )));
        }
        record.blueprint = Some(owned);
        Ok(())
    }

    /// Rejects crafting without the blueprint.
    pub fn set_crafted(&mut self, name: &str, crafted: bool) -> HousingResult<()> {
        let record = self.furnishing_mut(name)?;
        if record.crafted.is_none() {
            return Err(HousingError::InvalidRecord(format!("'{}' cannot be crafted", name)));
        }
        if crafted && !record.has_blueprint() {
            return Err(HousingError::InvalidRecord(format!(
                "cannot craft '{}' without its blueprint",
                name
            )));
        }
        record.crafted = Some(crafted);
        Ok(())
    }

    // ========================================================================
    // Sets
    // ========================================================================

    /// Un-owning a set clears all of its gift flags.
    pub fn set_set_owned(&mut self, name: &str, owned: bool) -> HousingResult<()> {
        let record = self
            .sets
            .get_mut(name)
            .ok_or_else(|| HousingError::incomplete("set", name))?;
        record.owned = owned;
        if !owned {
            if let Some(gifted) = record.companions.as_mut() {
                gifted.values_mut().for_each(|flag| *flag = false);
            }
        }
        Ok(())
    }

    /// A gift needs an owned set, a companion the set declares, and an owned companion.
    pub fn set_gifted(&mut self, set: &str, companion: &str, gifted: bool) -> HousingResult<()> {
        let companion_owned = self.companions.get(companion).copied().unwrap_or(false);
        let record = self
            .sets
            .get_mut(set)
            .ok_or_else(|| HousingError::incomplete("set", set))?;
        let flags = record.companions.as_mut().ok_or_else(|| {
            HousingError::InvalidRecord(format!("'{}' is not a gift set", set))
        })?;
        let flag = flags.get_mut(companion).ok_or_else(|| {
            HousingError::InvalidRecord(format!("'{}' is not gifted by '{}'", companion, set))
        })?;
        if gifted && !record.owned {
            return Err(HousingError::InvalidRecord(format!(
                "cannot gift '{}' before owning it",
                set
            )));
        }
        if gifted && !companion_owned {
            return Err(HousingError::InvalidRecord(format!(
                "companion '{}' is not owned",
                companion
            )));
        }
        *flag = gifted;
        Ok(())
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Checks every record invariant.
    pub fn validate(&self) -> HousingResult<()> {
        for (name, record) in &self.furnishings {
            if record.is_crafted() && !record.has_blueprint() {
                return Err(HousingError::InvalidRecord(format!(
                    "'{}' is crafted without its blueprint",
                    name
                )));
            }
        }
        for (name, record) in &self.sets {
            let Some(gifted) = record.companions.as_ref() else {
                continue;
            };
            for (companion, flag) in gifted {
                if !*flag {
                    continue;
                }
                if !record.owned {
                    return Err(HousingError::InvalidRecord(format!(
                        "'{}' is gifted to '{}' but not owned",
                        name, companion
                    )));
                }
                if !self.companions.get(companion).copied().unwrap_or(false) {
                    return Err(HousingError::InvalidRecord(format!(
                        "'{}' is gifted to '{}' who is not owned",
                        name, companion
                    )));
                }
            }
        }
        Ok(())
    }

    /// Number of metadata names with no inventory record.
    pub fn missing_records(&self, metadata: &Metadata) -> usize {
        metadata.companion_names().into_iter().filter(|n| !self.companions.contains_key(*n)).count()
            + metadata.materials.iter().filter(|n| !self.materials.contains_key(*n)).count()
            + metadata.furnishings.keys().filter(|n| !self.furnishings.contains_key(*n)).count()
            + metadata.sets.keys().filter(|n| !self.sets.contains_key(*n)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::housing::sync::reconcile;
    use crate::housing::types::{Furnishing, HousingSet, MaterialBill};

    fn synced() -> Inventory {
        let mut md = Metadata {
            companions: vec!["Paimon".into(), "Xiangling".into()],
            materials: vec!["Wood".into()],
            ..Metadata::default()
        };
        md.furnishings.insert(
            "Chair".into(),
            Furnishing::Craftable { materials: MaterialBill::from([("Wood".to_string(), 2)]), cost: None },
        );
        md.furnishings.insert("Lantern".into(), Furnishing::Purchasable { cost: 100 });
        md.sets.insert(
            "GiftSet".into(),
            HousingSet {
                furnishings: [("Chair".to_string(), 3)].into(),
                companions: Some(vec!["Paimon".into(), "Xiangling".into()]),
                ..HousingSet::default()
            },
        );
        let mut inv = Inventory::default();
        reconcile(&md, &mut inv);
        inv
    }

    #[test]
    fn crafted_requires_blueprint() {
        let mut inv = synced();
        assert!(matches!(inv.set_crafted("Chair", true), Err(HousingError::InvalidRecord(_))));
        inv.set_blueprint("Chair", true).unwrap();
        inv.set_crafted("Chair", true).unwrap();
        assert!(matches!(inv.set_blueprint("Chair", false), Err(HousingError::InvalidRecord(_))));
        assert!(inv.furnishings["Chair"].has_blueprint());
        inv.set_crafted("Chair", false).unwrap();
        inv.set_blueprint("Chair", false).unwrap();
        inv.validate().unwrap();
    }

    #[test]
    fn purchasable_furnishings_have_no_blueprint() {
        let mut inv = synced();
        assert!(inv.set_blueprint("Lantern", true).is_err());
        assert!(inv.set_crafted("Lantern", true).is_err());
        inv.set_furnishing_owned("Lantern", 2).unwrap();
        assert_eq!(inv.furnishings["Lantern"].owned, 2);
    }

    #[test]
    fn gifting_requires_owned_set_and_companion() {
        let mut inv = synced();
        assert!(inv.set_gifted("GiftSet", "Paimon", true).is_err());
        inv.set_set_owned("GiftSet", true).unwrap();
        assert!(inv.set_gifted("GiftSet", "Paimon", true).is_err());
        inv.set_companion_owned("Paimon", true).unwrap();
        inv.set_gifted("GiftSet", "Paimon", true).unwrap();
        assert!(inv.sets["GiftSet"].is_gifted("Paimon"));
        inv.validate().unwrap();
    }

    #[test]
    fn unowning_clears_gift_flags() {
        let mut inv = synced();
        inv.set_set_owned("GiftSet", true).unwrap();
        inv.set_companion_owned("Paimon", true).unwrap();
        inv.set_companion_owned("Xiangling", true).unwrap();
        inv.set_gifted("GiftSet", "Paimon", true).unwrap();
        inv.set_gifted("GiftSet", "Xiangling", true).unwrap();

        inv.set_companion_owned("Paimon", false).unwrap();
        assert!(!inv.sets["GiftSet"].is_gifted("Paimon"));
        assert!(inv.sets["GiftSet"].is_gifted("Xiangling"));

        inv.set_set_owned("GiftSet", false).unwrap();
        assert!(!inv.sets["GiftSet"].is_gifted("Xiangling"));
        inv.validate().unwrap();
    }

    #[test]
    fn validate_flags_hand_edited_records() {
        let mut inv = synced();
        inv.furnishings.get_mut("Chair").unwrap().crafted = Some(true);
        assert!(inv.validate().is_err());

        let mut inv = synced();
        inv.sets
            .get_mut("GiftSet")
            .unwrap()
            .companions
            .as_mut()
            .unwrap()
            .insert("Paimon".into(), true);
        assert!(inv.validate().is_err());
    }

    #[test]
    fn unknown_names_are_incomplete() {
        let mut inv = synced();
        assert_eq!(
            inv.set_material_count("Stone", 3),
            Err(HousingError::incomplete("material", "Stone"))
        );
    }
}
