//! Step executor - runs individual steps against the provisioner

use crate::{
    core::{Action, StepResult},
    provisioner::{PlanSummary, Provisioner, ProvisionerError},
};
use tracing::{debug, error, info};

/// Result of executing a step
#[derive(Debug, Clone)]
pub enum ExecutionResult {
    /// Provisioner reported success
    Success {
        output: String,
        changes: bool,
        summary: Option<PlanSummary>,
    },
    /// Provisioner reported failure or could not be invoked
    Failed { error: String, output: String },
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success { .. })
    }
}

/// Executes a single step
pub struct StepExecutor<P> {
    provisioner: P,
}

impl<P: Provisioner> StepExecutor<P> {
    pub fn new(provisioner: P) -> Self {
        Self { provisioner }
    }

    pub fn provisioner(&self) -> &P {
        &self.provisioner
    }

    /// Execute a step and return the result.
    ///
    /// Spawn errors, non-zero exits and timeouts all become `Failed`; the
    /// executor never retries.
    pub async fn execute(&self, step: &StepResult) -> ExecutionResult {
        let id = step.id();
        info!("Executing step: {}", id);

        let result = match step.action {
            Action::Init => self.provisioner.init(&step.dir).await,
            Action::Plan => self.provisioner.plan(&step.dir).await,
            Action::Apply => self.provisioner.apply(&step.dir, true).await,
        };

        match result {
            Ok(out) => {
                let summary = match step.action {
                    Action::Plan => PlanSummary::parse(&out.output),
                    _ => None,
                };
                debug!("Step {} output: {} bytes", id, out.output.len());
                info!("Step {} completed successfully", id);
                ExecutionResult::Success {
                    output: out.output,
                    changes: out.changes,
                    summary,
                }
            }
            Err(e) => {
                error!("Provisioner error for step {}: {}", id, e);
                let output = e.output().to_string();
                ExecutionResult::Failed {
                    error: describe(&e),
                    output,
                }
            }
        }
    }
}

fn describe(error: &ProvisionerError) -> String {
    match error {
        ProvisionerError::Spawn { .. } => format!("provisioner unavailable: {}", error),
        _ => error.to_string(),
    }
}
