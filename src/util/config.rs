//! Configuration file support for HdlFlow.
//!
//! HdlFlow supports two configuration file locations:
//! - Global: `~/.hdlflow/config.toml` - User-wide defaults
//! - Project: `.hdlflow/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! values take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// HdlFlow configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Riviera PRO flow defaults
    pub rivierapro: RivieraProConfig,

    /// VHDL style guide flow defaults
    pub vsg: VsgConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory holding per-flow build directories
    pub dir: Option<PathBuf>,
}

/// Default extra flags for the Riviera PRO tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RivieraProConfig {
    pub vlog_flags: Option<String>,
    pub vcom_flags: Option<String>,
    pub vmap_flags: Option<String>,
    pub vopt_flags: Option<String>,
    pub vsim_flags: Option<String>,
    pub timescale: Option<String>,
}

/// VHDL style guide defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VsgConfig {
    /// Rule configuration file
    pub rules: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.dir.is_some() {
            self.build.dir = other.build.dir;
        }

        let rp = other.rivierapro;
        merge_opt(&mut self.rivierapro.vlog_flags, rp.vlog_flags);
        merge_opt(&mut self.rivierapro.vcom_flags, rp.vcom_flags);
        merge_opt(&mut self.rivierapro.vmap_flags, rp.vmap_flags);
        merge_opt(&mut self.rivierapro.vopt_flags, rp.vopt_flags);
        merge_opt(&mut self.rivierapro.vsim_flags, rp.vsim_flags);
        merge_opt(&mut self.rivierapro.timescale, rp.timescale);

        if other.vsg.rules.is_some() {
            self.vsg.rules = other.vsg.rules;
        }
    }
}

fn merge_opt<T>(base: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *base = other;
    }
}

/// Pick a command-line string unless it is empty, else the configured one.
pub fn cli_or_config(cli: &str, config: Option<&String>) -> String {
    if cli.is_empty() {
        config.cloned().unwrap_or_default()
    } else {
        cli.to_string()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.hdlflow/config.toml)
/// 2. Global config (~/.hdlflow/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}
