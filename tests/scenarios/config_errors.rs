//! Test: Configuration errors - rejected before any provisioner call

use crate::helpers::*;
use promote::core::{ConfigError, Environment, EnvironmentSet, PipelinePlan};
use promote::execution::{ExecutionEngine, FailurePolicy};

/// An empty environment list is a configuration error
#[test]
fn test_empty_environment_list_rejected() {
    let err = EnvironmentSet::new(vec![]).unwrap_err();
    assert!(matches!(err, ConfigError::NoEnvironments));
}

/// Duplicate names are rejected
#[test]
fn test_duplicate_environment_rejected() {
    let err = EnvironmentSet::new(vec![
        Environment::new("dev", "a/dev"),
        Environment::new("dev", "b/dev"),
    ])
    .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateEnvironment(name) if name == "dev"));
}

/// An empty branch never resolves to a plan and never reaches the provisioner
#[tokio::test]
async fn test_empty_branch_rejected_without_calls() {
    let mock = MockProvisioner::new();
    let engine = ExecutionEngine::new(mock.clone(), FailurePolicy::FailFast);

    let err = engine.run("", &environments(&["dev", "prod"])).await.unwrap_err();

    assert!(matches!(err, ConfigError::EmptyBranch));
    assert!(mock.calls().is_empty());
}

#[test]
fn test_plan_resolution_rejects_empty_branch() {
    let result = PipelinePlan::resolve("", &environments(&["dev"]));
    assert!(matches!(result, Err(ConfigError::EmptyBranch)));
}
