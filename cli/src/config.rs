//! CLI configuration loading
//!
//! Loads configuration from `~/.config/conddb/conddb.toml` (or `CONDDB_CONFIG` env).
//! Command line flags override every value read here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Root configuration for the `conddb` binary
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Repository string passed to `conddb_backends::connect`
    #[serde(default)]
    pub repository: Option<String>,

    /// Tag used when a command does not name one
    #[serde(default = "default_tag")]
    pub default_tag: String,

    /// Tracing filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default)]
    pub output: OutputConfig,
}

fn default_tag() -> String {
    "HEAD".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

/// Output settings
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            repository: None,
            default_tag: default_tag(),
            log_filter: default_log_filter(),
            output: OutputConfig::default(),
        }
    }
}

impl CliConfig {
    /// Environment variable overriding the config file location
    pub const ENV_CONFIG_PATH: &'static str = "CONDDB_CONFIG";

    pub const DEFAULT_CONFIG_FILENAME: &'static str = "conddb.toml";

    /// Load configuration from file
    ///
    /// Resolution order:
    /// 1. `explicit` (the `--config` flag)
    /// 2. `CONDDB_CONFIG` environment variable
    /// 3. `~/.config/conddb/conddb.toml`
    ///
    /// A missing explicit file is an error; a missing default file yields
    /// the default configuration.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        let path = Self::resolve_config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from_path(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid config at {}", path.display()))
    }

    /// Parse configuration from TOML string
    pub fn parse(contents: &str) -> Result<Self> {
        let cfg: CliConfig = toml::from_str(contents).context("failed to parse config")?;
        cfg.validate();
        Ok(cfg)
    }

    fn resolve_config_path() -> PathBuf {
        if let Ok(path) = std::env::var(Self::ENV_CONFIG_PATH) {
            return PathBuf::from(path);
        }

        dirs::home_dir()
            .map(|h| {
                h.join(".config")
                    .join("conddb")
                    .join(Self::DEFAULT_CONFIG_FILENAME)
            })
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_CONFIG_FILENAME))
    }

    fn validate(&self) {
        if self.default_tag.trim().is_empty() {
            tracing::warn!("default_tag is empty; keys without --tag will not resolve");
        }
        if matches!(&self.repository, Some(repo) if repo.trim().is_empty()) {
            tracing::warn!("repository is set but empty");
        }
    }
}
