//! Main execution engine - orchestrates the entire promotion run

use crate::{
    core::{ConfigError, EnvironmentSet, PipelinePlan, PipelineRun, RunStatus, StepStatus, Target},
    execution::{ExecutionResult, FailurePolicy, StepExecutor},
    provisioner::{PlanSummary, Provisioner},
    reporting::StatusReporter,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Events that can occur during a run
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted {
        run_id: Uuid,
        branch: String,
        target: Target,
        total_steps: usize,
    },
    StepStarted {
        step_id: String,
    },
    StepSucceeded {
        step_id: String,
        changes: bool,
        summary: Option<PlanSummary>,
        output: String,
    },
    StepFailed {
        step_id: String,
        error: String,
        output: String,
    },
    StepSkipped {
        step_id: String,
        reason: String,
    },
    RunFinished {
        run_id: Uuid,
        status: RunStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&ExecutionEvent) + Send + Sync>;

/// Promotion pipeline engine
///
/// Resolves a branch into a plan, runs its steps one at a time in plan
/// order and hands the finished run to every registered reporter.
pub struct ExecutionEngine<P> {
    executor: StepExecutor<P>,
    policy: FailurePolicy,
    event_handlers: Vec<EventHandler>,
    reporters: Vec<Box<dyn StatusReporter>>,
}

impl<P: Provisioner> ExecutionEngine<P> {
    pub fn new(provisioner: P, policy: FailurePolicy) -> Self {
        Self {
            executor: StepExecutor::new(provisioner),
            policy,
            event_handlers: Vec::new(),
            reporters: Vec::new(),
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn provisioner(&self) -> &P {
        self.executor.provisioner()
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Add a status reporter
    pub fn add_reporter<R: StatusReporter + 'static>(&mut self, reporter: R) {
        self.reporters.push(Box::new(reporter));
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    /// Resolve `branch` against `environments`, execute and report.
    ///
    /// Configuration errors are returned before any provisioner call. Step
    /// failures never surface as `Err`: they are recorded in the run.
    pub async fn run(
        &self,
        branch: &str,
        environments: &EnvironmentSet,
    ) -> Result<PipelineRun, ConfigError> {
        let plan = PipelinePlan::resolve(branch, environments)?;
        Ok(self.run_plan(&plan).await)
    }

    /// Execute an already resolved plan and report the result
    pub async fn run_plan(&self, plan: &PipelinePlan) -> PipelineRun {
        let run = self.execute(plan).await;
        self.report(&run).await;
        run
    }

    /// Execute a resolved plan without reporting
    pub async fn execute(&self, plan: &PipelinePlan) -> PipelineRun {
        let mut run = PipelineRun::new(plan);

        info!(
            "Starting promotion run for branch {} ({}): {} step(s)",
            run.branch,
            run.run_id,
            run.steps.len()
        );
        run.start();
        self.emit_event(ExecutionEvent::RunStarted {
            run_id: run.run_id,
            branch: run.branch.clone(),
            target: run.target.clone(),
            total_steps: run.steps.len(),
        });

        for index in 0..run.steps.len() {
            if !matches!(run.steps[index].status, StepStatus::Pending) {
                continue;
            }

            let step_id = run.steps[index].id();
            run.steps[index].start();
            self.emit_event(ExecutionEvent::StepStarted {
                step_id: step_id.clone(),
            });

            match self.executor.execute(&run.steps[index]).await {
                ExecutionResult::Success {
                    output,
                    changes,
                    summary,
                } => {
                    run.steps[index].succeed(output.clone(), changes, summary);
                    self.emit_event(ExecutionEvent::StepSucceeded {
                        step_id,
                        changes,
                        summary,
                        output,
                    });
                }
                ExecutionResult::Failed { error, output } => {
                    run.steps[index].fail(error.clone(), output.clone());
                    self.emit_event(ExecutionEvent::StepFailed {
                        step_id,
                        error,
                        output,
                    });
                    self.skip_after(&mut run, index);
                }
            }
        }

        let status = run.finish();
        match status {
            RunStatus::Succeeded => info!("Promotion run {} succeeded", run.run_id),
            _ => error!("Promotion run {} failed", run.run_id),
        }
        self.emit_event(ExecutionEvent::RunFinished {
            run_id: run.run_id,
            status,
        });

        run
    }

    /// Mark the pending steps the failure policy rules out as skipped
    fn skip_after(&self, run: &mut PipelineRun, failed_index: usize) {
        let (done, rest) = run.steps.split_at_mut(failed_index + 1);
        let failed = &done[failed_index];
        let reason = self.policy.skip_reason(failed);

        for pending in rest.iter_mut() {
            if matches!(pending.status, StepStatus::Pending) && self.policy.skips(failed, pending) {
                pending.skip(reason.clone());
                self.emit_event(ExecutionEvent::StepSkipped {
                    step_id: pending.id(),
                    reason: reason.clone(),
                });
            }
        }
    }

    /// Hand the finished run to every reporter
    async fn report(&self, run: &PipelineRun) {
        for reporter in &self.reporters {
            if let Err(e) = reporter.report(run).await {
                warn!("Status reporter {} failed: {:#}", reporter.name(), e);
            }
        }
    }
}
