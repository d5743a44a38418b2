//! Provisioning engine capability and its terraform implementation

pub mod summary;
pub mod terraform;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub use summary::PlanSummary;
pub use terraform::TerraformClient;

/// Error types for provisioner invocations
#[derive(Debug, Error)]
pub enum ProvisionerError {
    #[error("failed to spawn {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {}", exit_code.map(|c| format!("code {}", c)).unwrap_or_else(|| "a signal".to_string()))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        output: String,
    },

    #[error("{command} timed out after {secs} seconds")]
    Timeout { command: String, secs: u64 },
}

impl ProvisionerError {
    /// Output captured before the failure, relayed upstream unmodified
    pub fn output(&self) -> &str {
        match self {
            ProvisionerError::CommandFailed { output, .. } => output,
            _ => "",
        }
    }
}

/// Successful provisioner invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionOutput {
    /// Combined stdout and stderr
    pub output: String,

    /// A plan found pending changes (a recoverable diff, not a failure)
    pub changes: bool,
}

impl ProvisionOutput {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            changes: false,
        }
    }

    pub fn with_changes(mut self, changes: bool) -> Self {
        self.changes = changes;
        self
    }
}

/// Trait for provisioning engines - allows fakes in tests
///
/// Every call runs with the environment directory as working context and
/// returns the captured output. Implementations never retry.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Prepare the working directory
    async fn init(&self, dir: &Path) -> Result<ProvisionOutput, ProvisionerError>;

    /// Compute changes without mutating infrastructure
    async fn plan(&self, dir: &Path) -> Result<ProvisionOutput, ProvisionerError>;

    /// Apply changes. Without `auto_approve` a non-interactive run fails
    /// instead of waiting for confirmation.
    async fn apply(&self, dir: &Path, auto_approve: bool)
        -> Result<ProvisionOutput, ProvisionerError>;

    /// Tear down everything in the directory. Operator use only; the
    /// pipeline never calls this.
    async fn destroy(&self, dir: &Path) -> Result<ProvisionOutput, ProvisionerError>;
}
