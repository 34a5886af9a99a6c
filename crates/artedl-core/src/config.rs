use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ArtedlError;

/// Output directory used when neither the command line nor config.toml names one.
pub const DEFAULT_DESTINATION: &str = "/tmp";

/// Variant selection parameters (`[selection]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Version codes tried in order; first one present in the manifest wins.
    pub preferred_codes: Vec<String>,
    /// Bitrate a variant must have to be considered by the version-code rules.
    pub bitrate: i64,
    /// Media type a variant must have to be considered by the version-code rules.
    pub media_type: String,
    /// Manifest keys tried after every preferred code has failed. Empty by
    /// default: a record under a fixed key is accepted regardless of bitrate
    /// or language, so these are opt-in.
    #[serde(default)]
    pub fallback_keys: Vec<String>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            preferred_codes: ["VF", "VO-STF", "VOF-STF", "VOA-STF", "VO"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            bitrate: 2200,
            media_type: "mp4".to_string(),
            fallback_keys: Vec::new(),
        }
    }
}

/// Persistent configuration loaded from `~/.config/artedl/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtedlConfig {
    /// Default output directory.
    pub destination: PathBuf,
    #[serde(default)]
    pub selection: SelectionConfig,
}

impl Default for ArtedlConfig {
    fn default() -> Self {
        Self {
            destination: PathBuf::from(DEFAULT_DESTINATION),
            selection: SelectionConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("artedl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ArtedlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ArtedlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path; the file must exist.
pub fn load_from(path: &Path) -> Result<ArtedlConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config file: {}", path.display()))?;
    let cfg: ArtedlConfig =
        toml::from_str(&data).with_context(|| format!("parse config file: {}", path.display()))?;
    Ok(cfg)
}

/// Inputs of a single run. Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub source_url: String,
    pub destination: PathBuf,
    pub debug: bool,
}

impl RunConfig {
    /// Validates command-line input. Only presence of the URL is checked,
    /// not its shape.
    pub fn new(
        source_url: Option<String>,
        destination: Option<PathBuf>,
        debug: bool,
        defaults: &ArtedlConfig,
    ) -> Result<Self, ArtedlError> {
        let source_url = source_url.unwrap_or_default();
        if source_url.is_empty() {
            return Err(ArtedlError::Config("missing required url".to_string()));
        }
        Ok(Self {
            source_url,
            destination: destination.unwrap_or_else(|| defaults.destination.clone()),
            debug,
        })
    }
}
