//! JSON status file reporter

use crate::core::{PipelineRun, RunStatus, StepResult, Target};
use crate::reporting::StatusReporter;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

/// Status document written for the CI system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub run_id: Uuid,
    pub branch: String,
    /// Absent when the run was refused before a plan existed
    pub target: Option<Target>,
    /// Binary pass/fail signal
    pub passed: bool,
    pub status: RunStatus,
    /// `action(env)` of the first failed step
    pub failed_step: Option<String>,
    /// Output of the first failed step, unmodified
    pub failure_output: Option<String>,
    /// Configuration error that refused the run before any step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub steps: Vec<StepResult>,
}

impl StatusReport {
    pub fn from_run(run: &PipelineRun) -> Self {
        let failed = run.failed_step();
        Self {
            run_id: run.run_id,
            branch: run.branch.clone(),
            target: Some(run.target.clone()),
            passed: run.is_success(),
            status: run.status,
            failed_step: failed.map(StepResult::id),
            failure_output: failed.and_then(|s| s.output()).map(str::to_string),
            error: None,
            steps: run.steps.clone(),
        }
    }

    /// Failed report for a run refused by a configuration error
    pub fn refused(branch: &str, error: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            branch: branch.to_string(),
            target: None,
            passed: false,
            status: RunStatus::Failed,
            failed_step: None,
            failure_output: None,
            error: Some(error.into()),
            steps: Vec::new(),
        }
    }
}

/// Writes a [`StatusReport`] as pretty JSON
pub struct JsonStatusReporter {
    path: PathBuf,
}

impl JsonStatusReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl StatusReporter for JsonStatusReporter {
    fn name(&self) -> &str {
        "json"
    }

    async fn report(&self, run: &PipelineRun) -> Result<()> {
        self.write(&StatusReport::from_run(run)).await
    }
}

impl JsonStatusReporter {
    /// Overwrite the status file with a failed report for a refused run
    pub async fn report_refused(&self, branch: &str, error: impl Into<String>) -> Result<()> {
        self.write(&StatusReport::refused(branch, error)).await
    }

    async fn write(&self, report: &StatusReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write status file {}", self.path.display()))?;

        info!("Status written to {}", self.path.display());
        Ok(())
    }
}
