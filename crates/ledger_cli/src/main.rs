//! Ledger CLI
//!
//! Command-line tools for ledger row files.
//!
//! # Commands
//!
//! - `check` - Load a JSON row file, resolve links and report validation errors
//! - `id` - Encode, decode and re-tag external ids

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ledger command-line tools.
#[derive(Parser)]
#[command(name = "ledger")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a row file and report every validation error
    Check {
        /// JSON array of rows: {"item_type", "id", "fields"}
        path: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Work with 64-bit external ids
    Id {
        #[command(subcommand)]
        action: IdAction,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum IdAction {
    /// Encode an asset type, major id and base id
    Encode {
        /// Asset type (deposit, cash, auto_expense, loan, ...)
        #[arg(value_parser = commands::id::parse_asset)]
        asset: ledger_core::AssetType,

        /// Base id
        base: u32,

        /// Major id
        #[arg(short, long, default_value = "0")]
        major: u32,
    },

    /// Decode an id into its components
    Decode {
        /// The id, decimal or 0x-prefixed hex
        #[arg(value_parser = commands::id::parse_raw)]
        id: u64,
    },

    /// Re-tag an id with another asset type
    Alternate {
        /// The id, decimal or 0x-prefixed hex
        #[arg(value_parser = commands::id::parse_raw)]
        id: u64,

        /// New asset type
        #[arg(value_parser = commands::id::parse_asset)]
        asset: ledger_core::AssetType,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Check { path, format } => {
            commands::check::run(&path, &format)?;
        }
        Commands::Id { action } => match action {
            IdAction::Encode { asset, base, major } => commands::id::encode(asset, major, base)?,
            IdAction::Decode { id } => commands::id::decode(id)?,
            IdAction::Alternate { id, asset } => commands::id::alternate(id, asset)?,
        },
        Commands::Version => {
            println!("Ledger CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
