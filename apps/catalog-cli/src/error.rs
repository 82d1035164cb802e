//! # CLI Error Types
//!
//! Errors raised before or around a catalog run. Failures of individual
//! catalog operations are not errors here: they become report lines.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       CLI Error Categories                              │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │     Script      │  │  Configuration  │  │         I/O             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Parse          │  │  InvalidConfig  │  │  Io                     │ │
//! │  │  (line, reason) │  │  ConfigLoad     │  │  Serialization          │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    // =========================================================================
    // Script Errors
    // =========================================================================
    /// A script line could not be parsed.
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration values are present but not usable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The config file is not valid TOML for [`CatalogConfig`](crate::config::CatalogConfig).
    #[error("Failed to load config: {0}")]
    ConfigLoad(#[from] toml::de::Error),

    // =========================================================================
    // I/O Errors
    // =========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        CliError::Parse {
            line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_line() {
        let err = CliError::parse(7, "expected 2 fields, found 1");
        assert_eq!(err.to_string(), "line 7: expected 2 fields, found 1");
    }

    #[test]
    fn test_toml_error_converts() {
        let toml_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: CliError = toml_err.into();
        assert!(err.to_string().starts_with("Failed to load config"));
    }
}
