//! CLI for markincomplete.

mod commands;
mod scenario;

use anyhow::Result;
use clap::{Parser, Subcommand};
use markincomplete_core::config;
use std::path::PathBuf;

use commands::{run_replay, run_set_extension, run_show_config};

/// Top-level CLI for markincomplete.
#[derive(Debug, Parser)]
#[command(name = "markincomplete")]
#[command(about = "Mark unfinished downloads with a temporary suffix", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Show the config file location and current extension.
    Config,

    /// Persist a new suffix for unfinished files.
    SetExtension {
        /// Suffix appended after a `.` (e.g. `!incomplete`, `part`).
        extension: String,
    },

    /// Replay a TOML scenario of host events against an in-memory client.
    Replay {
        /// Path to the scenario file.
        path: PathBuf,

        /// Override the configured (and scenario) extension.
        #[arg(long, value_name = "EXT")]
        extension: Option<String>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        // Replay reads the config but never creates one.
        let cfg = match cli.command {
            CliCommand::Replay { .. } => config::load_or_default()?,
            _ => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Config => run_show_config(&cfg)?,
            CliCommand::SetExtension { extension } => {
                run_set_extension(&config::config_path()?, cfg, &extension)?
            }
            CliCommand::Replay { path, extension } => {
                run_replay(&cfg, &path, extension.as_deref()).await?
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
