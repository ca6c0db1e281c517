//! tabhost - replay host sessions against the tab host controller
//!
//! # Examples
//!
//! ```bash
//! # Run a scripted session and print the final state as JSON
//! tabhost replay session.toml
//!
//! # Show the configuration that would be used
//! tabhost config
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tabhost::config::Config;
use tabhost::scenario::{self, Scenario};

/// tabhost - tabbed container for multi-window applications
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ~/.config/tabhost/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output raw JSON without pretty-printing
    #[arg(long, global = true)]
    raw: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a scenario file (TOML or JSON) through a headless host
    Replay {
        /// Scenario file
        path: PathBuf,

        /// Only print the last N event log entries
        #[arg(long)]
        events: Option<usize>,
    },

    /// Print the resolved configuration
    Config {
        /// Only print the config file path
        #[arg(long)]
        path: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path.clone()),
        None => Config::load(),
    };

    let output = match cli.command {
        Commands::Replay { path, events } => {
            let scenario = Scenario::load(&path)?;
            let mut outcome = scenario::run(&scenario, config)?;
            if let Some(n) = events {
                let skip = outcome.event_log.len().saturating_sub(n);
                outcome.event_log.drain(..skip);
            }
            if !outcome.violations.is_empty() {
                log::warn!("{} state violation(s) after replay", outcome.violations.len());
            }
            serde_json::to_value(&outcome).context("Failed to serialize outcome")?
        }
        Commands::Config { path } => {
            let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
            if path {
                println!("{}", config_path.display());
                return Ok(());
            }
            serde_json::json!({
                "path": config_path,
                "close_tab_chord": config.close_tab_chord(),
                "config": config,
            })
        }
    };

    let text = if cli.raw {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{}", text);
    Ok(())
}
