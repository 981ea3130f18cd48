//! CLI for XDM, the external dependency manager.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use xdm_core::config;

use commands::{run_list, run_sync};

/// Top-level CLI for XDM.
#[derive(Debug, Parser)]
#[command(name = "xdm")]
#[command(about = "XDM: fetch the files named by reference markers in your workspaces", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve every reference marker and download what it names.
    Sync {
        /// Workspace manifest (TOML list of workspaces).
        #[arg(
            short,
            long = "config",
            value_name = "FILE",
            visible_aliases = ["cnfg", "configuration-path"]
        )]
        config: PathBuf,
        /// Run up to N fetches at once (0 = no limit). Defaults to max_concurrent_fetches from config.toml.
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Show what `sync` would fetch, without downloading anything.
    List {
        /// Workspace manifest (TOML list of workspaces).
        #[arg(
            short,
            long = "config",
            value_name = "FILE",
            visible_aliases = ["cnfg", "configuration-path"]
        )]
        config: PathBuf,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Sync { config, jobs } => run_sync(&cfg, &config, jobs).await?,
            CliCommand::List { config } => run_list(&cfg, &config)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
