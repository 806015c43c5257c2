//! # Housing Engine
//!
//! Domain model and analysis for the housing system: furnishings, sets,
//! materials and companions on the metadata side, and the user's owned
//! counts, blueprints, crafted flags and gifts on the inventory side.
//!
//! ## Data flow
//!
//! ```text
//! metadata + inventory
//!        │
//!  sync::reconcile        ← add records for new metadata entries
//!        │
//!  analysis::analyze      ← classify shortfalls into milestones
//!        │
//!  ┌─────┴──────┐
//!  recipe       cost      ← material bills and currency totals
//! ```
//!
//! Everything here is synchronous and free of I/O. Loading and saving lives
//! in [`crate::storage`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use realmkeep::housing::{analyze, reconcile, Inventory, Metadata, Milestone};
//!
//! # fn run(metadata: Metadata) -> Result<(), realmkeep::housing::HousingError> {
//! let mut inventory = Inventory::default();
//! reconcile(&metadata, &mut inventory);
//! let analysis = analyze(&metadata, &inventory)?;
//! let wood = analysis.materials.get(Milestone::Union).totals.get("Pine Wood");
//! println!("{:?}", wood);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cost;
pub mod errors;
pub mod inventory;
pub mod recipe;
pub mod report;
pub mod sync;
pub mod types;

pub use analysis::{analyze, Analysis, Dimension, DimensionReport, Milestone, MilestoneResult};
pub use cost::{cost_of, CostKind, CostTotals};
pub use errors::{HousingError, HousingResult};
pub use recipe::{aggregate_materials, aggregate_materials_for_set};
pub use sync::reconcile;
pub use types::{
    Furnishing, FurnishingRecord, HousingSet, Inventory, ItemCounts, MaterialBill, Metadata,
    SetRecord, MORA_SCALE,
};
