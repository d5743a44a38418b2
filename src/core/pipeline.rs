//! Pipeline plan: resolves a branch name into ordered provisioning steps

use crate::core::{
    environment::EnvironmentSet,
    error::ConfigError,
    step::{Action, PlannedStep},
};
use serde::{Deserialize, Serialize};

/// Actions run when the branch names an environment
const PROMOTION_ACTIONS: [Action; 3] = [Action::Init, Action::Plan, Action::Apply];

/// Actions run against every environment for any other branch
const VALIDATION_ACTIONS: [Action; 2] = [Action::Init, Action::Plan];

/// What a branch resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "environment", rename_all = "snake_case")]
pub enum Target {
    /// Branch matched this environment: promote into it
    Environment(String),
    /// Branch matched nothing: validate against every environment
    AllEnvironments,
}

/// Ordered list of steps for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelinePlan {
    pub branch: String,
    pub target: Target,
    pub steps: Vec<PlannedStep>,
}

impl PipelinePlan {
    /// Build the plan for `branch`.
    ///
    /// A branch equal to an environment name yields `init, plan, apply` for
    /// that environment alone. Any other branch yields `init, plan` for each
    /// environment in set order and never contains `apply`. An
    /// `EnvironmentSet` is never empty, so only the branch is checked here.
    pub fn resolve(branch: &str, environments: &EnvironmentSet) -> Result<Self, ConfigError> {
        if branch.is_empty() {
            return Err(ConfigError::EmptyBranch);
        }

        let (target, steps): (Target, Vec<PlannedStep>) = match environments.get(branch) {
            Some(env) => (
                Target::Environment(env.name.clone()),
                PROMOTION_ACTIONS
                    .iter()
                    .map(|action| PlannedStep::new(env.clone(), *action))
                    .collect(),
            ),
            None => (
                Target::AllEnvironments,
                environments
                    .iter()
                    .flat_map(|env| {
                        VALIDATION_ACTIONS
                            .iter()
                            .map(move |action| PlannedStep::new(env.clone(), *action))
                    })
                    .collect(),
            ),
        };

        Ok(Self {
            branch: branch.to_string(),
            target,
            steps,
        })
    }

    /// True if any step mutates provisioned infrastructure
    pub fn is_mutating(&self) -> bool {
        self.steps.iter().any(|s| s.action.is_mutating())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
