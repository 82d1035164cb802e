//! # CLI Configuration
//!
//! Configuration for the `catalog` binary.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line flags (highest priority, applied in main)             │
//! │     --format json, -v, -q                                              │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     CATALOG_FORMAT=json                                                │
//! │     CATALOG_LOG=catalog_core=debug                                     │
//! │     CATALOG_ECHO=true                                                  │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/catalog/catalog.toml (Linux)                             │
//! │     ~/Library/Application Support/com.discount.catalog/catalog.toml    │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     text output, 2 decimals, log level warn                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # catalog.toml
//! [output]
//! format = "text"       # text | json
//! precision = 2         # decimals for prices
//! echo_commands = false # print each query before its result
//!
//! [logging]
//! level = "warn"        # EnvFilter directive, e.g. "info,catalog_core=debug"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::{CliError, CliResult};

/// Largest accepted `output.precision`.
pub const MAX_PRECISION: usize = 10;

// =============================================================================
// Output Format
// =============================================================================

/// How run results are rendered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One status line per query.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "plain" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(CliError::InvalidConfig(format!(
                "Unknown output format: '{}'. Valid options: text, json",
                other
            ))),
        }
    }
}

// =============================================================================
// Settings Sections
// =============================================================================

/// Report rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,

    /// Decimal places for prices in text output.
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Print each query line before its result.
    #[serde(default)]
    pub echo_commands: bool,
}

fn default_precision() -> usize {
    2
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            format: OutputFormat::default(),
            precision: default_precision(),
            echo_commands: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: default_log_level(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl CatalogConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`catalog.toml`)
    /// 3. Environment variables
    ///
    /// An explicitly given path must exist; the default path may be absent.
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let mut config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::InvalidConfig(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(&path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                path => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parses one TOML file without overrides or validation.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        info!(?path, "Loading catalog config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        if self.output.precision > MAX_PRECISION {
            return Err(CliError::InvalidConfig(format!(
                "precision must be at most {}, got {}",
                MAX_PRECISION, self.output.precision
            )));
        }

        if let Err(err) = EnvFilter::try_new(&self.logging.level) {
            return Err(CliError::InvalidConfig(format!(
                "invalid log filter '{}': {}",
                self.logging.level, err
            )));
        }

        Ok(())
    }

    /// Applies `CATALOG_*` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(format) = lookup("CATALOG_FORMAT") {
            match format.parse() {
                Ok(parsed) => {
                    debug!(format = %format, "Overriding output format from environment");
                    self.output.format = parsed;
                }
                Err(_) => warn!(format = %format, "Unknown output format in environment"),
            }
        }

        if let Some(level) = lookup("CATALOG_LOG") {
            debug!(level = %level, "Overriding log level from environment");
            self.logging.level = level;
        }

        if let Some(echo) = lookup("CATALOG_ECHO") {
            match echo.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.output.echo_commands = true,
                "0" | "false" | "no" | "off" => self.output.echo_commands = false,
                _ => warn!(echo = %echo, "Unknown echo setting in environment"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "discount", "catalog")
            .map(|dirs| dirs.config_dir().join("catalog.toml"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
