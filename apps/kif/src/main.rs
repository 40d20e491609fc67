//! # KIF - statement filter tool
//!
//! The command-line front end for the kif-core filter algebra.
//!
//! ## Usage
//!
//! ```bash
//! # Normalize a filter
//! kif normalize -f filter.json
//!
//! # Conjoin filters
//! kif combine -f a.json -f b.json --json-mode
//!
//! # Select matching statements
//! kif match -f filter.json -s statements.json
//! ```
//!
//! Logs go to stderr. `RUST_LOG` overrides the level, `KIF_LOG_FORMAT=json`
//! switches to machine-parseable output.

use clap::Parser;
use kif::cli::{self, Cli};
use kif::config::{KifConfig, LOG_FORMAT_ENV, LogFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = Cli::parse();

    // Tracing is not up yet: configuration errors go straight to stderr.
    let config = match KifConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let env_format = std::env::var(LOG_FORMAT_ENV).ok();
    init_tracing(
        config.effective_log_format(env_format.as_deref()),
        cli.verbose,
    );

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(&cli, &config) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat, verbose: bool) {
    let default_directives = if verbose {
        "kif=debug,kif_core=debug"
    } else {
        "kif=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives.into());

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Print the startup banner to stderr, keeping stdout for results.
fn print_banner() {
    eprintln!(
        "kif v{} - statement filter algebra\n",
        env!("CARGO_PKG_VERSION")
    );
}
