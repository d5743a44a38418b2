//! Execution state models

use crate::core::{
    pipeline::{PipelinePlan, Target},
    step::{Action, PlannedStep},
};
use crate::provisioner::PlanSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;
use uuid::Uuid;

/// Overall pipeline run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Run has not started
    Pending,
    /// Steps are executing
    Running,
    /// Every attempted step succeeded
    Succeeded,
    /// At least one step failed
    Failed,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Succeeded | RunStatus::Failed)
    }
}

/// State of a single step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum StepStatus {
    /// Step has not been attempted yet
    Pending,
    /// Step is currently running
    Running { started_at: DateTime<Utc> },
    /// Provisioner reported success
    Succeeded {
        output: String,
        /// Plan reported pending changes (terraform exit code 2)
        changes: bool,
        summary: Option<PlanSummary>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    },
    /// Provisioner reported failure or could not be invoked
    Failed {
        error: String,
        output: String,
        started_at: DateTime<Utc>,
        failed_at: DateTime<Utc>,
    },
    /// Never attempted because an earlier step failed
    Skipped { reason: String },
}

impl StepStatus {
    /// Check if step is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepStatus::Succeeded { .. } | StepStatus::Failed { .. } | StepStatus::Skipped { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Running { .. } => "running",
            StepStatus::Succeeded { .. } => "succeeded",
            StepStatus::Failed { .. } => "failed",
            StepStatus::Skipped { .. } => "skipped",
        }
    }
}

/// Result of one (environment, action) step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub environment: String,
    pub dir: PathBuf,
    pub action: Action,
    pub status: StepStatus,
}

impl StepResult {
    pub fn pending(step: &PlannedStep) -> Self {
        Self {
            environment: step.environment.name.clone(),
            dir: step.environment.dir.clone(),
            action: step.action,
            status: StepStatus::Pending,
        }
    }

    /// Human-readable identifier, e.g. `plan(dev)`
    pub fn id(&self) -> String {
        format!("{}({})", self.action, self.environment)
    }

    /// Pending -> Running
    pub fn start(&mut self) {
        if !matches!(self.status, StepStatus::Pending) {
            warn!("Step {} cannot start from state {}", self.id(), self.status.label());
            return;
        }
        self.status = StepStatus::Running {
            started_at: Utc::now(),
        };
    }

    /// Running -> Succeeded
    pub fn succeed(&mut self, output: String, changes: bool, summary: Option<PlanSummary>) {
        let StepStatus::Running { started_at } = self.status else {
            warn!("Step {} cannot succeed from state {}", self.id(), self.status.label());
            return;
        };
        self.status = StepStatus::Succeeded {
            output,
            changes,
            summary,
            started_at,
            finished_at: Utc::now(),
        };
    }

    /// Running -> Failed
    pub fn fail(&mut self, error: String, output: String) {
        let StepStatus::Running { started_at } = self.status else {
            warn!("Step {} cannot fail from state {}", self.id(), self.status.label());
            return;
        };
        self.status = StepStatus::Failed {
            error,
            output,
            started_at,
            failed_at: Utc::now(),
        };
    }

    /// Pending -> Skipped
    pub fn skip(&mut self, reason: impl Into<String>) {
        if !matches!(self.status, StepStatus::Pending) {
            warn!("Step {} cannot be skipped from state {}", self.id(), self.status.label());
            return;
        }
        self.status = StepStatus::Skipped {
            reason: reason.into(),
        };
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self.status, StepStatus::Succeeded { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, StepStatus::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, StepStatus::Skipped { .. })
    }

    /// Captured provisioner output, if the step was attempted
    pub fn output(&self) -> Option<&str> {
        match &self.status {
            StepStatus::Succeeded { output, .. } | StepStatus::Failed { output, .. } => {
                Some(output.as_str())
            }
            _ => None,
        }
    }
}

/// One execution of a pipeline plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    /// Unique run ID
    pub run_id: Uuid,

    /// Branch that triggered the run
    pub branch: String,

    pub target: Target,

    pub status: RunStatus,

    /// Per-step results in execution order
    pub steps: Vec<StepResult>,

    pub started_at: Option<DateTime<Utc>>,

    pub finished_at: Option<DateTime<Utc>>,
}

impl PipelineRun {
    /// Create a pending run with every planned step pending
    pub fn new(plan: &PipelinePlan) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            branch: plan.branch.clone(),
            target: plan.target.clone(),
            status: RunStatus::Pending,
            steps: plan.steps.iter().map(StepResult::pending).collect(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Pending -> Running
    pub fn start(&mut self) {
        if self.status != RunStatus::Pending {
            warn!("Run {} cannot start from {:?}", self.run_id, self.status);
            return;
        }
        self.status = RunStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Running -> Succeeded | Failed, decided by the attempted steps
    pub fn finish(&mut self) -> RunStatus {
        if self.status != RunStatus::Running {
            warn!("Run {} cannot finish from {:?}", self.run_id, self.status);
            return self.status;
        }
        self.status = if self.steps.iter().any(StepResult::is_failed) {
            RunStatus::Failed
        } else {
            RunStatus::Succeeded
        };
        self.finished_at = Some(Utc::now());
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Succeeded
    }

    /// First failed step, the one whose output explains the failure
    pub fn failed_step(&self) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.is_failed())
    }

    /// Look up a step by environment and action
    pub fn step(&self, environment: &str, action: Action) -> Option<&StepResult> {
        self.steps
            .iter()
            .find(|s| s.environment == environment && s.action == action)
    }

    /// Step IDs (`action(env)`) in execution order
    pub fn step_ids(&self) -> Vec<String> {
        self.steps.iter().map(StepResult::id).collect()
    }

    pub fn succeeded_count(&self) -> usize {
        self.steps.iter().filter(|s| s.is_succeeded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.steps.iter().filter(|s| s.is_failed()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.steps.iter().filter(|s| s.is_skipped()).count()
    }

    /// Wall-clock duration, once the run has finished
    pub fn duration(&self) -> Option<std::time::Duration> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.signed_duration_since(start).to_std().ok(),
            _ => None,
        }
    }
}
