//! Runtime configuration
//!
//! Layered lowest to highest: built-in defaults, the TOML config file,
//! `PORTS_*` environment variables (a `.env` file is honoured), then
//! command-line flags applied by the caller.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const ENV_SOURCE_PATH: &str = "PORTS_SOURCE_PATH";
pub const ENV_OUTPUT_PATH: &str = "PORTS_OUTPUT_PATH";
pub const ENV_SHEET: &str = "PORTS_SHEET";
pub const ENV_DATABASE_URL: &str = "PORTS_DATABASE_URL";

const DEFAULT_SOURCE_PATH: &str = "UNLOCODE.xlsx";
const DEFAULT_OUTPUT_PATH: &str = "ports.sql";
const DEFAULT_SHEET: &str = "UNLOCODE";
const DEFAULT_DATABASE_URL: &str = "sqlite://ports.db";

/// Settings for the persistent store
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub database_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

/// Everything a run needs to know about its inputs and outputs
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// UN/LOCODE workbook to read
    pub source_path: PathBuf,
    /// Where generated scripts and CSV artifacts are written
    pub output_path: PathBuf,
    /// Sheet holding the code list
    pub sheet_name: String,
    pub store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            sheet_name: DEFAULT_SHEET.to_string(),
            store: StoreConfig::default(),
        }
    }
}

/// Default config file location (~/.config/ports-cli/config.toml)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ports-cli").join("config.toml"))
}

impl Config {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse config")
    }

    /// Load from `path`, or from the default location if it exists
    ///
    /// An explicitly given path must exist. Environment overrides are
    /// applied on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Override fields from environment lookups
    ///
    /// Takes the lookup as a function so tests need not touch the process
    /// environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_SOURCE_PATH) {
            self.source_path = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_OUTPUT_PATH) {
            self.output_path = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_SHEET) {
            self.sheet_name = v;
        }
        if let Some(v) = get(ENV_DATABASE_URL) {
            self.store.database_url = v;
        }
    }
}
