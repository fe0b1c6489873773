//! Configuration loading and validation.
//!
//! `coroner.toml` is optional. Every section uses `#[serde(default)]`, so a
//! missing or empty file yields the built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::scanner::{ScanOptions, DEFAULT_MAX_LINE_BYTES};

/// Smallest accepted `scan.max_line_bytes`.
const MIN_LINE_BYTES: usize = 16;
/// Largest accepted `scan.max_line_bytes` (1 MB).
const MAX_LINE_BYTES: usize = 1_048_576;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace", "off"];

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoronerConfig {
    /// Log scanning limits.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Report output.
    #[serde(default)]
    pub output: OutputConfig,

    /// Diagnostic logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Log scanning limits.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Lines longer than this are truncated before keyword matching.
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: default_max_line_bytes(),
        }
    }
}

impl ScanConfig {
    /// Scanner options for this config.
    pub fn options(&self) -> ScanOptions {
        ScanOptions {
            max_line_bytes: self.max_line_bytes,
        }
    }
}

/// Report rendering format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Report output settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Format used unless overridden on the command line.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Diagnostic logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter applied when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl CoronerConfig {
    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (MIN_LINE_BYTES..=MAX_LINE_BYTES).contains(&self.scan.max_line_bytes),
            "scan.max_line_bytes must be between {MIN_LINE_BYTES} and {MAX_LINE_BYTES}"
        );
        anyhow::ensure!(
            LOG_LEVELS.contains(&self.logging.level.as_str()),
            "logging.level must be one of: {}",
            LOG_LEVELS.join(", ")
        );
        Ok(())
    }
}

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
pub fn load_config(path: &Path) -> anyhow::Result<CoronerConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    let config: CoronerConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config at {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Load the explicit config if given, else the default file if it exists,
/// else defaults.
///
/// # Errors
///
/// Returns an error if an explicit or existing default file is invalid.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<CoronerConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    match default_config_path() {
        Ok(path) if path.exists() => load_config(&path),
        _ => Ok(CoronerConfig::default()),
    }
}

/// Resolve the default config directory (`~/.coroner/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".coroner"))
}

/// Default config file path (`~/.coroner/coroner.toml`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("coroner.toml"))
}

// Default value functions for serde

fn default_max_line_bytes() -> usize {
    DEFAULT_MAX_LINE_BYTES
}
fn default_log_level() -> String {
    "warn".to_owned()
}
