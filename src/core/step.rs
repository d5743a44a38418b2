//! Step domain model

use crate::core::environment::Environment;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provisioning action run against one environment directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Prepare the working directory (providers, backend, modules)
    Init,
    /// Compute the change set without mutating infrastructure
    Plan,
    /// Apply changes with auto-approval
    Apply,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Init => "init",
            Action::Plan => "plan",
            Action::Apply => "apply",
        }
    }

    /// Whether this action mutates provisioned infrastructure
    pub fn is_mutating(&self) -> bool {
        matches!(self, Action::Apply)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single (environment, action) pair in a pipeline plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    pub environment: Environment,
    pub action: Action,
}

impl PlannedStep {
    pub fn new(environment: Environment, action: Action) -> Self {
        Self { environment, action }
    }

    /// Human-readable identifier, e.g. `plan(dev)`
    pub fn id(&self) -> String {
        format!("{}({})", self.action, self.environment.name)
    }
}
