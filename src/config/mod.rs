//! # Configuration Management Module
//!
//! Settings for where data lives and how logging behaves, stored as TOML.
//!
//! ## Configuration Structure
//!
//! - [`StorageConfig`] - Data directory, file names and size limits
//! - [`LoggingConfig`] - Log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use realmkeep::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("config.toml").await?;
//!     println!("Data directory: {}", config.storage.data_dir);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [storage]
//! data_dir = "./data"
//! metadata_file = "metadata.json"
//! inventory_file = "inventory.json"
//! max_file_bytes = 8388608
//!
//! [logging]
//! level = "info"
//! file = "realmkeep.log"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,
    #[serde(default = "default_inventory_file")]
    pub inventory_file: String,
    /// Upper bound on JSON files read from disk.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
}

fn default_metadata_file() -> String {
    "metadata.json".to_string()
}

fn default_inventory_file() -> String {
    "inventory.json".to_string()
}

fn default_max_file_bytes() -> usize {
    8 * 1024 * 1024
}

impl StorageConfig {
    pub fn metadata_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.metadata_file)
    }

    pub fn inventory_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.inventory_file)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
}

impl LoggingConfig {
    /// Configured level, falling back to `info` for unknown names.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Load configuration, or use defaults when the file does not exist.
    pub async fn load_or_default(path: &str) -> Result<Self> {
        match fs::metadata(path).await {
            Ok(_) => Self::load(path).await,
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(anyhow!("Failed to stat config file {}: {}", path, e)),
        }
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage: StorageConfig {
                data_dir: "./data".to_string(),
                metadata_file: default_metadata_file(),
                inventory_file: default_inventory_file(),
                max_file_bytes: default_max_file_bytes(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: None,
            },
        }
    }
}
