//! # KIF CLI Module
//!
//! This module implements the CLI interface for KIF.
//!
//! ## Available Commands
//!
//! - `normalize` - Normalize a filter read from a JSON file
//! - `combine` - Conjoin several filters into one
//! - `match` - Select the statements a filter matches

mod commands;

use crate::config::KifConfig;
use clap::{Parser, Subcommand};
use kif_core::KifError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// KIF - statement filter tool
///
/// Normalizes, combines and evaluates knowledge-graph statement filters.
/// Filters and statements are read as JSON.
#[derive(Parser, Debug)]
#[command(name = "kif")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file (default: ./kif.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize a filter
    Normalize {
        /// Path to the filter (JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Combine filters into their conjunction
    Combine {
        /// Paths to the filters (JSON), repeat for each filter
        #[arg(short = 'f', long = "file", required = true)]
        files: Vec<PathBuf>,
    },

    /// Select the statements matched by a filter
    Match {
        /// Path to the filter (JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Path to the statements (JSON array)
        #[arg(short, long)]
        statements: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: &Cli, config: &KifConfig) -> Result<(), KifError> {
    let json_mode = cli.json_mode;

    match &cli.command {
        Commands::Normalize { file } => cmd_normalize(config, json_mode, file),
        Commands::Combine { files } => cmd_combine(config, json_mode, files),
        Commands::Match { file, statements } => cmd_match(config, json_mode, file, statements),
    }
}
