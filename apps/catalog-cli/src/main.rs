//! # catalog: Batch Catalog Runner
//!
//! Command line entry point.
//!
//! ## Commands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  catalog run   <FILE|->   parse + execute, one result line per query   │
//! │  catalog check <FILE|->   parse only, print counts                     │
//! │  catalog tree  <FILE|->   build nodes + relationships, draw the tree   │
//! │                                                                         │
//! │  global: --config PATH  --format text|json  -v / -q                    │
//! │  exit:   0 ok, 1 on I/O, parse, or configuration failure               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalog_cli::config::{CatalogConfig, OutputFormat};
use catalog_cli::report::{self, Summary};
use catalog_cli::{runner, script};

/// Category catalog with a cached most-discounted product per category.
#[derive(Debug, Parser)]
#[command(
    name = "catalog",
    author,
    version,
    about = "Discount Catalog - batch script runner",
    long_about = None,
    arg_required_else_help = true
)]
struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output format (overrides config and CATALOG_FORMAT).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,
    /// Debug logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Errors only.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Execute a script and print one result per query.
    Run(ScriptArgs),
    /// Parse a script without executing it.
    Check(ScriptArgs),
    /// Build the hierarchy from a script and draw it.
    Tree(ScriptArgs),
}

#[derive(Debug, Clone, Args)]
struct ScriptArgs {
    /// Script file, or `-` for stdin.
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CatalogConfig::load(cli.config.clone()).context("loading configuration")?;
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    init_tracing(&cli, &config);

    match &cli.command {
        Command::Run(args) => run(&args.input, &config),
        Command::Check(args) => check(&args.input, &config),
        Command::Tree(args) => tree(&args.input, &config),
    }
}

fn init_tracing(cli: &Cli, config: &CatalogConfig) {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else if cli.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_script(input: &Path) -> Result<script::Script> {
    let text = if input == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading script from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("reading script {}", input.display()))?
    };

    script::parse(&text).with_context(|| format!("parsing script {}", input.display()))
}

fn run(input: &Path, config: &CatalogConfig) -> Result<()> {
    let script = read_script(input)?;
    info!(queries = script.queries.len(), "Running script");
    let (_, report) = runner::run(&script);

    match config.output.format {
        OutputFormat::Text => print!("{}", report::render_text(&report, &config.output)),
        OutputFormat::Json => println!("{}", report::render_json(&report)?),
    }
    Ok(())
}

fn check(input: &Path, config: &CatalogConfig) -> Result<()> {
    let script = read_script(input)?;
    let summary = Summary::of_script(&script);

    match config.output.format {
        OutputFormat::Text => print!("{}", report::render_summary_text(&summary)),
        OutputFormat::Json => println!("{}", report::render_json(&summary)?),
    }
    Ok(())
}

fn tree(input: &Path, config: &CatalogConfig) -> Result<()> {
    let script = read_script(input)?;
    let (catalog, report) = runner::build(&script);

    match config.output.format {
        OutputFormat::Text => {
            eprint!("{}", report::render_text(&report, &config.output));
            print!("{}", report::render_tree(&catalog, config.output.precision));
        }
        OutputFormat::Json => println!("{}", catalog.snapshot().to_json()?),
    }
    Ok(())
}
