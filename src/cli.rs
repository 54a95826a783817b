// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! NOTE: this expects `clap` to be built with the `derive` feature, e.g.:
//! `clap = { version = "4.5.53", features = ["derive"] }` in `Cargo.toml`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `techtree`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "techtree",
    version,
    about = "Lay out a research dependency tree and export its coordinates.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the definitions file (TOML).
    ///
    /// Default: `Tree.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Tree.toml")]
    pub config: String,

    /// Optional `[pins]` overlay to apply on top of the definitions,
    /// typically a previous `--export` saved to a file.
    #[arg(long, value_name = "PATH")]
    pub pins: Option<String>,

    /// Parse + validate, print the tree, but don't run the layout.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the position export instead of the layout summary.
    #[arg(long, value_enum, value_name = "SCOPE")]
    pub export: Option<ExportArg>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TECHTREE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Export scope as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum ExportArg {
    /// Every pinned item.
    All,
    /// Only items moved in edit mode.
    Changed,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
