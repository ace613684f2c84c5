// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;
use crate::types::MissingTargetPolicy;

/// Command-line arguments for `dagmake`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dagmake",
    version,
    about = "Run named targets and their prerequisites, in order.",
    long_about = None
)]
pub struct CliArgs {
    /// Targets to run, in order. Defaults to `[config].default_target`.
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Path to the config file (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Directory to run commands in, overriding `[config].working_dir`.
    #[arg(short = 'C', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Print what would run, but don't execute any commands.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// List targets with their description and prerequisites.
    #[arg(short, long)]
    pub list: bool,

    /// Keep running targets that don't depend on a failed one.
    #[arg(short, long)]
    pub keep_going: bool,

    /// How to treat prerequisites that are not defined as targets.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub missing: Option<MissingTargetPolicy>,

    /// Write the built-in recipe_crypt workflow to `--config` and exit.
    #[arg(long)]
    pub init: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DAGMAKE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
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
