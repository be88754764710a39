//! # stockscan CLI
//!
//! Command-line front end for the capture loop and the inventory file.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Startup                                      │
//! │                                                                         │
//! │  1. Parse arguments (clap)                                             │
//! │     └── global: --config, --inventory, --log-level                     │
//! │                                                                         │
//! │  2. Initialize tracing (to stderr)                                     │
//! │     └── --log-level, else RUST_LOG, else "info"                        │
//! │                                                                         │
//! │  3. Resolve configuration                                              │
//! │     └── defaults → stockscan.toml → STOCKSCAN_* env → flags            │
//! │                                                                         │
//! │  4. Run the subcommand                                                 │
//! │     └── any error → message on stderr, exit status 1                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! stdout carries command output only, so `stockscan list --json` can be
//! piped.

pub mod commands;

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use stockscan_core::Money;
use stockscan_scanner::ScannerConfig;
use tracing_subscriber::EnvFilter;

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "stockscan")]
#[command(about = "Count inventory by scanning barcodes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir / stockscan.toml)
    #[arg(long, global = true, env = "STOCKSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Inventory file, overriding the configuration
    #[arg(long, global = true)]
    pub inventory: Option<PathBuf>,

    /// Log verbosity (default: RUST_LOG, else info)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan barcodes from a live camera until Ctrl+C or `q`
    Scan {
        /// Camera index (default: from config)
        #[arg(long)]
        camera: Option<u32>,
    },

    /// Run the capture loop over a directory of photos
    Replay {
        /// Directory of images, read in file-name order
        dir: PathBuf,
    },

    /// Print the barcodes found in images without touching the inventory
    Decode {
        #[arg(required = true)]
        images: Vec<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Add a product by hand
    Add {
        code: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        price: Option<Money>,

        #[arg(long)]
        stock: Option<u64>,
    },

    /// Change name, price or stock of a product
    Edit {
        code: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        price: Option<Money>,

        #[arg(long)]
        stock: Option<u64>,
    },

    /// Print the inventory
    List {
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

// =============================================================================
// Entry Point
// =============================================================================

pub fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_level);

    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Scan { camera } => commands::capture::scan(&config, camera),
        Commands::Replay { dir } => commands::capture::replay(&config, &dir),
        Commands::Decode { images, json } => commands::decode::run(&images, json),
        Commands::Add {
            code,
            name,
            price,
            stock,
        } => commands::product::add(&config, &code, name, price, stock),
        Commands::Edit {
            code,
            name,
            price,
            stock,
        } => commands::product::edit(&config, &code, name, price, stock),
        Commands::List { json } => commands::list::run(&config, json),
        Commands::Config => commands::config::run(&config),
    }
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr; stdout is reserved for command output.
fn init_tracing(level: Option<LogLevel>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level.to_string()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads configuration and applies command-line overrides.
pub fn resolve_config(cli: &Cli) -> Result<ScannerConfig> {
    let mut config = ScannerConfig::load(cli.config.clone()).context("Cannot load configuration")?;

    if let Some(path) = &cli.inventory {
        config.inventory.path = path.clone();
    }
    config.validate()?;

    Ok(config)
}
