//! Test: Feature branches - validate every environment, never apply

use crate::helpers::*;
use promote::core::{Action, RunStatus, Target};
use promote::execution::FailurePolicy;

/// init and plan run for every environment in order; apply never runs
#[tokio::test]
async fn test_feature_branch_validates_all_environments() {
    let (run, calls) = run_with_mock(
        "feature-x",
        &["dev", "staging", "prod"],
        MockProvisioner::new(),
        FailurePolicy::FailFast,
    )
    .await;

    assert_run_status(&run, RunStatus::Succeeded);
    assert_eq!(run.target, Target::AllEnvironments);
    assert_eq!(
        calls,
        vec![
            "init(dev)",
            "plan(dev)",
            "init(staging)",
            "plan(staging)",
            "init(prod)",
            "plan(prod)",
        ]
    );
    assert!(calls.iter().all(|c| !c.starts_with("apply")));
    assert!(run.steps.iter().all(|s| s.action != Action::Apply));
}

/// Environment order is preserved as given, not re-sorted
#[tokio::test]
async fn test_environment_order_is_preserved() {
    let (_, calls) = run_with_mock(
        "main",
        &["prod", "dev"],
        MockProvisioner::new(),
        FailurePolicy::FailFast,
    )
    .await;

    assert_eq!(calls, vec!["init(prod)", "plan(prod)", "init(dev)", "plan(dev)"]);
}

/// Plans reporting changes do not fail a validation run
#[tokio::test]
async fn test_pending_changes_do_not_fail_validation() {
    let mock = MockProvisioner::new()
        .with("plan(dev)", Outcome::Changes("Plan: 1 to add, 0 to change, 0 to destroy.".to_string()))
        .with("plan(prod)", Outcome::Ok("No changes. Your infrastructure matches the configuration.".to_string()));

    let (run, _) = run_with_mock("feature-y", &["dev", "prod"], mock, FailurePolicy::FailFast).await;

    assert_run_status(&run, RunStatus::Succeeded);
    assert_eq!(run.succeeded_count(), 4);
    assert_eq!(run.failed_count(), 0);
}
