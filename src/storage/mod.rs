//! # Storage Module - Data Persistence Layer
//!
//! Loads and saves housing metadata and the user inventory as JSON files in a
//! data directory:
//!
//! ```text
//! data/
//! ├── metadata.json   ← reference data (furnishings, sets, materials, companions)
//! └── inventory.json  ← what the user owns
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use realmkeep::config::Config;
//! use realmkeep::storage::Storage;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let storage = Storage::new(&Config::default().storage).await?;
//!     if let Some(metadata) = storage.load_metadata().await? {
//!         println!("{} furnishings", metadata.furnishings.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Writes
//!
//! Writes lock the destination and go through a `.partial` sibling that is
//! renamed into place, so a crash mid-write leaves the previous file intact.

use anyhow::{anyhow, Result};
use fs2::FileExt;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::StorageConfig;
use crate::housing::{Inventory, Metadata};
use crate::validation::secure_json_parse;

/// Main storage interface
pub struct Storage {
    data_dir: PathBuf,
    metadata_path: PathBuf,
    inventory_path: PathBuf,
    max_file_bytes: usize,
}

impl Storage {
    /// Initialize storage, creating the data directory if needed.
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)
            .await
            .map_err(|e| anyhow!("Failed to create data directory {}: {}", config.data_dir, e))?;

        Ok(Storage {
            data_dir: PathBuf::from(&config.data_dir),
            metadata_path: config.metadata_path(),
            inventory_path: config.inventory_path(),
            max_file_bytes: config.max_file_bytes,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// `None` when no metadata has been imported yet.
    pub async fn load_metadata(&self) -> Result<Option<Metadata>> {
        self.read_json(&self.metadata_path).await
    }

    pub async fn save_metadata(&self, metadata: &Metadata) -> Result<()> {
        self.write_json(&self.metadata_path, metadata).await?;
        info!(
            "Saved metadata: {} furnishings, {} sets",
            metadata.furnishings.len(),
            metadata.sets.len()
        );
        Ok(())
    }

    /// Read metadata from an arbitrary JSON file and store it.
    pub async fn import_metadata(&self, source: &Path) -> Result<Metadata> {
        let metadata: Metadata = self
            .read_json(source)
            .await?
            .ok_or_else(|| anyhow!("Could not find path '{}'", source.display()))?;
        self.save_metadata(&metadata).await?;
        Ok(metadata)
    }

    // ========================================================================
    // Inventory
    // ========================================================================

    /// `None` when the user has no inventory yet. Loaded inventories are validated.
    pub async fn load_inventory(&self) -> Result<Option<Inventory>> {
        let inventory: Option<Inventory> = self.read_json(&self.inventory_path).await?;
        if let Some(inv) = &inventory {
            inv.validate()
                .map_err(|e| anyhow!("{}: {}", self.inventory_path.display(), e))?;
        }
        Ok(inventory)
    }

    pub async fn save_inventory(&self, inventory: &Inventory) -> Result<()> {
        self.write_json(&self.inventory_path, inventory).await?;
        debug!("Saved inventory to {}", self.inventory_path.display());
        Ok(())
    }

    /// Returns whether there was an inventory to delete.
    pub async fn delete_inventory(&self) -> Result<bool> {
        match fs::remove_file(&self.inventory_path).await {
            Ok(()) => {
                warn!("Deleted inventory {}", self.inventory_path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(anyhow!("Failed to delete inventory: {}", e)),
        }
    }

    /// Copy the current inventory to `target`. Returns false when there is none.
    pub async fn export_inventory(&self, target: &Path) -> Result<bool> {
        let Some(inventory) = self.load_inventory().await? else {
            return Ok(false);
        };
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        self.write_json(target, &inventory).await?;
        info!("Exported inventory to {}", target.display());
        Ok(true)
    }

    /// Replace the current inventory with the one in `source`.
    pub async fn import_inventory(&self, source: &Path) -> Result<Inventory> {
        let inventory: Inventory = self
            .read_json(source)
            .await?
            .ok_or_else(|| anyhow!("Could not find path '{}'", source.display()))?;
        inventory
            .validate()
            .map_err(|e| anyhow!("{}: {}", source.display(), e))?;
        self.save_inventory(&inventory).await?;
        info!("Imported inventory from {}", source.display());
        Ok(inventory)
    }

    // ========================================================================
    // JSON helpers
    // ========================================================================

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        match fs::read_to_string(path).await {
            Ok(data) => {
                let value = secure_json_parse(&data, self.max_file_bytes)
                    .map_err(|e| anyhow!("Failed to parse {}: {}", path.display(), e))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow!("Failed reading {}: {}", path.display(), e)),
        }
    }

    /// Replace `path` with the JSON form of `value`.
    ///
    /// The destination stays locked while a sibling `.partial` file is
    /// written and synced, then renamed over it. Readers see either the old
    /// document or the new one.
    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let content = serde_json::to_vec_pretty(value)
            .map_err(|e| anyhow!("Failed to serialize {}: {}", path.display(), e))?;

        let guard = std::fs::OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| anyhow!("Failed to open {}: {}", path.display(), e))?;
        guard
            .lock_exclusive()
            .map_err(|e| anyhow!("Failed to lock {}: {}", path.display(), e))?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("Invalid file path {}", path.display()))?;
        let partial = path.with_file_name(format!(".{}.{}.partial", file_name, std::process::id()));

        let mut staged = fs::File::create(&partial)
            .await
            .map_err(|e| anyhow!("Failed to create {}: {}", partial.display(), e))?;
        staged.write_all(&content).await?;
        staged.sync_all().await?;
        drop(staged);

        if let Err(e) = fs::rename(&partial, path).await {
            let _ = fs::remove_file(&partial).await;
            return Err(anyhow!("Failed to replace {}: {}", path.display(), e));
        }
        drop(guard);
        Ok(())
    }
}
