//! promote - branch-driven environment promotion for Terraform repositories

pub mod cli;
pub mod core;
pub mod execution;
pub mod provisioner;
pub mod reporting;

// Re-export commonly used types
pub use core::{
    Action, ConfigError, Environment, EnvironmentSet, PipelinePlan, PipelineRun, RunStatus,
    StepResult, StepStatus, Target,
};
pub use execution::{ExecutionEngine, ExecutionEvent, FailurePolicy};
pub use provisioner::{PlanSummary, ProvisionOutput, Provisioner, ProvisionerError, TerraformClient};
pub use reporting::{ConsoleReporter, JsonStatusReporter, StatusReporter};
