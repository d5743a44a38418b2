//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{DestroyCommand, ListCommand, PlanCommand, RunCommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Branch-driven environment promotion for Terraform repositories
#[derive(Debug, Parser, Clone)]
#[command(name = "promote")]
#[command(version)]
#[command(about = "Promote infrastructure changes through per-environment branches", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file (defaults to ./promote.yaml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Resolve the branch, run terraform and report pass/fail
    Run(RunCommand),

    /// Show the steps a branch would run, without running them
    Plan(PlanCommand),

    /// List known environments
    List(ListCommand),

    /// Destroy one environment (operator only, never run by the pipeline)
    Destroy(DestroyCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
