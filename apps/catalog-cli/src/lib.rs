//! # catalog-cli
//!
//! Batch front end for catalog-core: parses the line-oriented script
//! format, runs it against a [`Catalog`](catalog_core::Catalog), and renders
//! the results.
//!
//! ## Modules
//!
//! - [`config`] - `catalog.toml`, environment overrides, defaults
//! - [`script`] - Script parser
//! - [`runner`] - Executes a script against a catalog
//! - [`report`] - Text, JSON, and tree rendering
//! - [`error`] - CLI error types

pub mod config;
pub mod error;
pub mod report;
pub mod runner;
pub mod script;

pub use config::{CatalogConfig, OutputFormat};
pub use error::{CliError, CliResult};
