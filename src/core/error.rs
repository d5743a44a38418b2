//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that refuse a run before any provisioning step executes
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("branch name is empty")]
    EmptyBranch,

    #[error("no environments configured")]
    NoEnvironments,

    #[error("duplicate environment name: {0}")]
    DuplicateEnvironment(String),

    #[error("invalid environment name: '{0}'")]
    InvalidEnvironmentName(String),

    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    #[error("failed to read environments directory {}: {source}", path.display())]
    EnvironmentsDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
