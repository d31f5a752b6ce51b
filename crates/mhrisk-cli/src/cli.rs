//! CLI argument definitions for the feature pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "mhrisk",
    version,
    about = "Derive mental-health and chronic-disease risk features from patient records",
    long_about = "Derive a model-ready feature table from raw per-patient clinical records.\n\n\
                  Normalizes diagnosis codes, lab results and demographics, classifies labs\n\
                  against clinical thresholds and aggregates risk indicators per patient."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Derive the feature table for a project.
    Run(RunArgs),

    /// List the lab tests the classifier recognizes and their thresholds.
    Labs,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Project configuration file (TOML).
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub config: PathBuf,

    /// Patient table to read (overrides `[data] input`).
    #[arg(long = "input", short = 'i', value_name = "PARQUET")]
    pub input: Option<PathBuf>,

    /// Feature table to write, `.parquet` or `.csv` (overrides `[data] output`).
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also write the run report as JSON.
    #[arg(long = "report", value_name = "JSON")]
    pub report: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
