//! CLI command definitions

use clap::Args;
use std::path::PathBuf;

/// Branch and environment selection shared by `run` and `plan`
#[derive(Debug, Args, Clone)]
pub struct TargetArgs {
    /// Branch that triggered the pipeline
    #[arg(short, long, env = "BRANCH_NAME")]
    pub branch: Option<String>,

    /// Directory whose subdirectories are the environments
    #[arg(short = 'd', long)]
    pub environments_dir: Option<PathBuf>,
}

/// Run the promotion pipeline
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Keep validating other environments after a failure
    #[arg(long)]
    pub continue_on_failure: bool,

    /// Write a JSON status report to this file
    #[arg(long)]
    pub status_file: Option<PathBuf>,

    /// Path to terraform executable
    #[arg(long)]
    pub terraform: Option<String>,

    /// Timeout for each terraform command (in seconds)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Print the final run as JSON
    #[arg(long)]
    pub json: bool,
}

/// Show the resolved plan for a branch
#[derive(Debug, Args, Clone)]
pub struct PlanCommand {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// List known environments
#[derive(Debug, Args, Clone)]
pub struct ListCommand {
    /// Directory whose subdirectories are the environments
    #[arg(short = 'd', long)]
    pub environments_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Destroy an environment
#[derive(Debug, Args, Clone)]
pub struct DestroyCommand {
    /// Environment to destroy
    pub environment: String,

    /// Directory whose subdirectories are the environments
    #[arg(short = 'd', long)]
    pub environments_dir: Option<PathBuf>,

    /// Confirm the destroy
    #[arg(long)]
    pub yes: bool,
}
