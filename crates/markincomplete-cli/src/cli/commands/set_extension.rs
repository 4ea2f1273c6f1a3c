//! `markincomplete set-extension` – validate and persist a new suffix.

use anyhow::{Context, Result};
use markincomplete_core::config::{validate_extension, PluginConfig};
use std::path::Path;

pub fn run_set_extension(path: &Path, mut cfg: PluginConfig, extension: &str) -> Result<()> {
    validate_extension(extension).context("refusing extension")?;
    if cfg.extension == extension {
        println!("extension already set to {}", extension);
        return Ok(());
    }
    tracing::info!("changing extension from {} to {}", cfg.extension, extension);
    cfg.extension = extension.to_string();
    cfg.save_to_path(path)?;
    println!("extension set to {}", extension);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use markincomplete_core::config::load_or_init_at;

    #[test]
    fn persists_new_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        run_set_extension(&path, PluginConfig::default(), "part").unwrap();
        assert_eq!(load_or_init_at(&path).unwrap().extension, "part");
    }

    #[test]
    fn rejects_invalid_extension_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(run_set_extension(&path, PluginConfig::default(), "a/b").is_err());
        assert!(!path.exists());
    }
}
