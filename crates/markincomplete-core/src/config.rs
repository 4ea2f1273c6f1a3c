use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffix used when no config file exists yet.
pub const DEFAULT_EXTENSION: &str = "!incomplete";

/// Reasons an extension is refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("extension must not be empty")]
    EmptyExtension,
    #[error("extension {0:?} must not contain a path separator or NUL")]
    InvalidExtension(String),
}

/// Plugin configuration loaded from `~/.config/markincomplete/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Suffix appended (after a `.`) to files that are still downloading.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
        }
    }
}

/// Check that `extension` can be appended to a file name as-is.
///
/// An empty extension would make every path "already suffixed", so no job
/// would ever be eligible.
pub fn validate_extension(extension: &str) -> Result<(), ConfigError> {
    if extension.is_empty() {
        return Err(ConfigError::EmptyExtension);
    }
    if extension.contains(['/', '\\', '\0']) {
        return Err(ConfigError::InvalidExtension(extension.to_string()));
    }
    Ok(())
}

impl PluginConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_extension(&self.extension)
    }

    /// Write this config as TOML, creating the parent dir if needed.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let toml = toml::to_string_pretty(self).context("serialize config")?;
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        Ok(())
    }

    /// Persist to the default config path.
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&config_path()?)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("markincomplete")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PluginConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<PluginConfig> {
    if !path.exists() {
        let default_cfg = PluginConfig::default();
        default_cfg.save_to_path(path)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    read_config(path)
}

/// Load configuration without writing anything: a missing file yields the
/// defaults.
pub fn load_or_default() -> Result<PluginConfig> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("markincomplete")?;
    match xdg_dirs.find_config_file("config.toml") {
        Some(path) => read_config(&path),
        None => Ok(PluginConfig::default()),
    }
}

/// Same as [`load_or_default`] for an explicit path.
pub fn load_or_default_at(path: &Path) -> Result<PluginConfig> {
    if !path.exists() {
        return Ok(PluginConfig::default());
    }
    read_config(path)
}

fn read_config(path: &Path) -> Result<PluginConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: PluginConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config: {}", path.display()))?;
    Ok(cfg)
}
