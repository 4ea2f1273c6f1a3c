//! `markincomplete config` – show where the config lives and what it holds.

use anyhow::Result;
use markincomplete_core::config::{self, PluginConfig};

pub fn run_show_config(cfg: &PluginConfig) -> Result<()> {
    println!("config:    {}", config::config_path()?.display());
    println!("extension: {}", cfg.extension);
    Ok(())
}
