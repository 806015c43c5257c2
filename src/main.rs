//! Binary entrypoint for the Realmkeep CLI.
//!
//! Commands:
//! - `init` - create a starter `config.toml` and the data directory
//! - `import-metadata <path>` - store housing metadata from a JSON file
//! - `status` - print metadata and inventory counts
//! - `sync` - add inventory records for new metadata entries
//! - `analyze [--view <view>] [--json]` - show what is missing per milestone
//! - `recipe <furnishing> [count]` / `set-info <set>` - on-demand lookups
//! - `companion`, `material`, `furnishing`, `set` - edit the inventory
//! - `backup <path> --import|--export`, `reset --yes` - inventory file management
//!
//! See the library crate docs for module‑level details: `realmkeep::`.
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info, warn};
use std::path::PathBuf;

use realmkeep::config::Config;
use realmkeep::housing::report;
use realmkeep::housing::{analyze, reconcile, Furnishing, HousingError, Inventory, Metadata};
use realmkeep::storage::Storage;
use realmkeep::validation::{normalize_name, parse_flag, parse_quantity};

#[derive(Parser)]
#[command(name = "realmkeep")]
#[command(about = "A utility for the Genshin Impact housing system")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default configuration file and data directory
    Init,
    /// Store housing metadata from a JSON file
    ImportMetadata {
        /// Metadata JSON file
        path: PathBuf,
    },
    /// Show metadata and inventory counts
    Status,
    /// Add inventory records for metadata entries that have none
    Sync,
    /// Analyze the inventory against the housing metadata
    Analyze {
        /// Which part of the analysis to print
        #[arg(long, value_enum, default_value_t = View::All)]
        view: View,
        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show materials and cost for crafting a furnishing
    Recipe {
        #[arg(value_parser = normalize_name)]
        furnishing: String,
        #[arg(default_value = "1", value_parser = parse_quantity)]
        count: u64,
    },
    /// Show what is still missing for a set
    SetInfo {
        #[arg(value_parser = normalize_name)]
        name: String,
    },
    /// Mark a companion as owned (yes) or not (no)
    Companion {
        #[arg(value_parser = normalize_name)]
        name: String,
        #[arg(action = clap::ArgAction::Set, value_parser = parse_flag)]
        owned: bool,
    },
    /// Set how many of a material are owned
    Material {
        #[arg(value_parser = normalize_name)]
        name: String,
        #[arg(value_parser = parse_quantity)]
        count: u64,
    },
    /// Update a furnishing's owned count, blueprint or crafted flag
    Furnishing {
        #[arg(value_parser = normalize_name)]
        name: String,
        #[arg(long, value_parser = parse_quantity)]
        owned: Option<u64>,
        #[arg(long, value_parser = parse_flag)]
        blueprint: Option<bool>,
        #[arg(long, value_parser = parse_flag)]
        crafted: Option<bool>,
    },
    /// Update a set's blueprint or a companion's gift
    Set {
        #[arg(value_parser = normalize_name)]
        name: String,
        #[arg(long, value_parser = parse_flag)]
        owned: Option<bool>,
        /// Companion who has received this gift set
        #[arg(long, value_name = "COMPANION")]
        gift: Option<String>,
        /// Companion whose gift should be cleared
        #[arg(long, value_name = "COMPANION")]
        ungift: Option<String>,
    },
    /// Export the inventory to a file, or import it from one
    Backup {
        path: PathBuf,
        /// Import inventory from <path>
        #[arg(short, long, conflicts_with = "export")]
        import: bool,
        /// Export inventory to <path>
        #[arg(short, long)]
        export: bool,
    },
    /// Delete the stored inventory
    Reset {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum View {
    All,
    Materials,
    Currency,
    Furnishings,
    Sets,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Config is optional for every command; init writes it afterwards
    let config = match Config::load_or_default(&cli.config).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };
    init_logging(&config, cli.verbose);

    if let Err(e) = run(cli, config).await {
        if let Some(HousingError::MissingMetadata) = e.downcast_ref::<HousingError>() {
            error!("Housing data not found! Import it with `realmkeep import-metadata <path>`");
        } else {
            error!("{e:#}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let storage = Storage::new(&config.storage).await?;

    match cli.command {
        Commands::Init => {
            info!("Initializing new configuration");
            if std::path::Path::new(&cli.config).exists() {
                warn!("{} already exists; leaving it unchanged", cli.config);
            } else {
                Config::create_default(&cli.config).await?;
                info!("Configuration file created at {}", cli.config);
            }
            info!("Data directory ready at {}", storage.data_dir().display());
        }
        Commands::ImportMetadata { path } => {
            let metadata = storage.import_metadata(&path).await?;
            println!(
                "Imported {} furnishings, {} sets, {} materials, {} companions.",
                metadata.furnishings.len(),
                metadata.sets.len(),
                metadata.materials.len(),
                metadata.companions.len()
            );
            let mut inventory = storage.load_inventory().await?.unwrap_or_default();
            if reconcile(&metadata, &mut inventory) {
                storage.save_inventory(&inventory).await?;
            }
        }
        Commands::Status => {
            let metadata = storage
                .load_metadata()
                .await?
                .ok_or(HousingError::MissingMetadata)?;
            let inventory = storage.load_inventory().await?.unwrap_or_default();
            println!("{}", status_summary(&metadata, &inventory));
        }
        Commands::Sync => {
            let metadata = storage
                .load_metadata()
                .await?
                .ok_or(HousingError::MissingMetadata)?;
            let mut inventory = storage.load_inventory().await?.unwrap_or_default();
            if reconcile(&metadata, &mut inventory) {
                storage.save_inventory(&inventory).await?;
                println!("Inventory updated.");
            } else {
                println!("Inventory already up to date.");
            }
        }
        Commands::Analyze { view, json } => {
            let (metadata, inventory) = load_state(&storage).await?;
            let analysis = analyze(&metadata, &inventory)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
                return Ok(());
            }
            let mut sections = Vec::new();
            if matches!(view, View::All | View::Materials) {
                sections.push(report::render_materials(&metadata, &inventory, &analysis));
            }
            if matches!(view, View::All | View::Currency) {
                sections.push(report::render_currency(&analysis));
            }
            if matches!(view, View::All | View::Furnishings) {
                sections.push(report::render_furnishings(&metadata, &inventory, &analysis));
            }
            if matches!(view, View::All | View::Sets) {
                sections.push(report::render_sets(&metadata, &inventory, &analysis));
            }
            println!("{}", sections.join("\n"));
        }
        Commands::Recipe { furnishing, count } => {
            let (metadata, inventory) = load_state(&storage).await?;
            print!(
                "{}",
                report::render_furnishing_detail(&metadata, &inventory, &furnishing, count)?
            );
        }
        Commands::SetInfo { name } => {
            let (metadata, inventory) = load_state(&storage).await?;
            let analysis = analyze(&metadata, &inventory)?;
            print!("{}", report::render_set_detail(&metadata, &inventory, &analysis, &name)?);
        }
        Commands::Companion { name, owned } => {
            let (_, mut inventory) = load_state(&storage).await?;
            inventory.set_companion_owned(&name, owned)?;
            storage.save_inventory(&inventory).await?;
        }
        Commands::Material { name, count } => {
            let (_, mut inventory) = load_state(&storage).await?;
            inventory.set_material_count(&name, count)?;
            storage.save_inventory(&inventory).await?;
        }
        Commands::Furnishing {
            name,
            owned,
            blueprint,
            crafted,
        } => {
            let (_, mut inventory) = load_state(&storage).await?;
            if let Some(count) = owned {
                inventory.set_furnishing_owned(&name, count)?;
            }
            // Blueprint first when granting, crafted first when revoking
            match (blueprint, crafted) {
                (Some(false), Some(c)) => {
                    inventory.set_crafted(&name, c)?;
                    inventory.set_blueprint(&name, false)?;
                }
                (b, c) => {
                    if let Some(b) = b {
                        inventory.set_blueprint(&name, b)?;
                    }
                    if let Some(c) = c {
                        inventory.set_crafted(&name, c)?;
                    }
                }
            }
            storage.save_inventory(&inventory).await?;
        }
        Commands::Set {
            name,
            owned,
            gift,
            ungift,
        } => {
            let (_, mut inventory) = load_state(&storage).await?;
            if let Some(owned) = owned {
                inventory.set_set_owned(&name, owned)?;
            }
            if let Some(companion) = gift {
                inventory.set_gifted(&name, companion.trim(), true)?;
            }
            if let Some(companion) = ungift {
                inventory.set_gifted(&name, companion.trim(), false)?;
            }
            storage.save_inventory(&inventory).await?;
        }
        Commands::Backup { path, import, export } => {
            if !import && !export {
                return Err(anyhow!("choose --import or --export"));
            }
            if export {
                if storage.export_inventory(&path).await? {
                    println!("Exported backup!");
                } else {
                    return Err(anyhow!("Could not load inventory!"));
                }
            } else {
                storage.import_inventory(&path).await?;
                println!("Imported backup!");
            }
        }
        Commands::Reset { yes } => {
            if !yes {
                println!("This deletes your inventory. Re-run with --yes to confirm.");
                return Ok(());
            }
            if storage.delete_inventory().await? {
                println!("Deleted inventory!");
            } else {
                println!("Could not find inventory!");
            }
        }
    }

    Ok(())
}

/// Load metadata and inventory, syncing and saving the inventory when needed.
async fn load_state(storage: &Storage) -> Result<(Metadata, Inventory)> {
    let metadata = storage
        .load_metadata()
        .await?
        .ok_or(HousingError::MissingMetadata)?;
    let mut inventory = storage.load_inventory().await?.unwrap_or_default();
    if reconcile(&metadata, &mut inventory) {
        storage.save_inventory(&inventory).await?;
    }
    Ok((metadata, inventory))
}

fn status_summary(metadata: &Metadata, inventory: &Inventory) -> String {
    let craftable = metadata
        .furnishings
        .values()
        .filter(|f| f.is_craftable())
        .count();
    let purchasable = metadata
        .furnishings
        .values()
        .filter(|f| matches!(f, Furnishing::Purchasable { .. }))
        .count();
    let gift_sets = metadata.sets.values().filter(|s| s.is_gift_set()).count();
    let blueprints = inventory
        .furnishings
        .values()
        .filter(|r| r.has_blueprint())
        .count();
    let crafted = inventory.furnishings.values().filter(|r| r.is_crafted()).count();
    let sets_owned = inventory.sets.values().filter(|r| r.owned).count();
    let companions_owned = inventory.companions.values().filter(|o| **o).count();

    format!(
        "Metadata:\n  furnishings: {} ({} craftable, {} purchasable)\n  sets:        {} ({} gift sets)\n  materials:   {}\n  companions:  {}\n\nInventory:\n  blueprints owned: {}\n  crafted:          {}\n  sets owned:       {}\n  companions owned: {}\n  records to sync:  {}",
        metadata.furnishings.len(),
        craftable,
        purchasable,
        metadata.sets.len(),
        gift_sets,
        metadata.materials.len(),
        metadata.companions.len(),
        blueprints,
        crafted,
        sets_owned,
        companions_owned,
        inventory.missing_records(metadata),
    )
}

fn init_logging(config: &Config, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides config
    let base_level = match verbosity {
        0 => config.logging.level_filter(),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config.logging.file.as_ref().and_then(|file| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .ok()
    });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Echo to the console only when attached to a terminal
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
