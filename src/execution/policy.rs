//! Failure policy - decides which remaining steps a failure skips

use crate::core::StepResult;
use serde::{Deserialize, Serialize};

/// What happens to the rest of the run after a step fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Skip every remaining step
    #[default]
    FailFast,

    /// Skip only the remaining steps of the failed environment; other
    /// environments still run and the run still fails
    ContinueOnFailure,
}

impl FailurePolicy {
    /// Whether `pending` must be skipped because `failed` failed
    pub fn skips(&self, failed: &StepResult, pending: &StepResult) -> bool {
        match self {
            FailurePolicy::FailFast => true,
            FailurePolicy::ContinueOnFailure => pending.environment == failed.environment,
        }
    }

    /// Reason recorded on skipped steps
    pub fn skip_reason(&self, failed: &StepResult) -> String {
        match self {
            FailurePolicy::FailFast => format!("{} failed", failed.id()),
            FailurePolicy::ContinueOnFailure => {
                format!("{} failed in the same environment", failed.id())
            }
        }
    }
}
