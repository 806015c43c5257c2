//! # Realmkeep - Housing Inventory Tracker
//!
//! Realmkeep tracks a personal inventory for the Genshin Impact housing system
//! and works out what is still missing: which furnishings to craft or buy,
//! which sets to unlock, and how many materials and how much currency that
//! takes.
//!
//! ## Features
//!
//! - **Gap Analysis**: Seven fixed milestones, measured in materials and in currency.
//! - **Recipe Rollup**: Multi-furnishing bills of materials scaled by quantity.
//! - **Cost Rules**: Blueprints are charged once, purchases per unit, sets in currency or mora.
//! - **Inventory Sync**: New metadata entries get default inventory records automatically.
//! - **Safe Persistence**: Locked, atomic JSON writes with validation on load.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use realmkeep::config::Config;
//! use realmkeep::housing::{analyze, reconcile, Inventory};
//! use realmkeep::storage::Storage;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("config.toml").await?;
//!     let storage = Storage::new(&config.storage).await?;
//!
//!     let metadata = storage.load_metadata().await?.expect("metadata imported");
//!     let mut inventory = storage.load_inventory().await?.unwrap_or_default();
//!     if reconcile(&metadata, &mut inventory) {
//!         storage.save_inventory(&inventory).await?;
//!     }
//!
//!     let analysis = analyze(&metadata, &inventory)?;
//!     println!("{} sets incomplete", analysis.sets.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`housing`] - Domain model, gap analysis, recipes, costs and inventory sync
//! - [`storage`] - JSON persistence for metadata and inventory
//! - [`config`] - Configuration management
//! - [`validation`] - User input and file parsing checks

pub mod config;
pub mod housing;
pub mod storage;
pub mod validation;
