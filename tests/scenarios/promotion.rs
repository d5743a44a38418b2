//! Test: Promotion - a branch named after an environment applies to it

use crate::helpers::*;
use promote::core::{Action, RunStatus, StepStatus, Target};
use promote::execution::FailurePolicy;

/// Only the matching environment is touched, in init/plan/apply order
#[tokio::test]
async fn test_promotion_branch_applies_matching_environment() {
    let (run, calls) = run_with_mock(
        "prod",
        &["dev", "prod"],
        MockProvisioner::new(),
        FailurePolicy::FailFast,
    )
    .await;

    assert_run_status(&run, RunStatus::Succeeded);
    assert_eq!(run.target, Target::Environment("prod".to_string()));
    assert_eq!(calls, vec!["init(prod)", "plan(prod)", "apply(prod)"]);
    assert_eq!(run.step_ids(), calls);
    assert!(run.step("dev", Action::Init).is_none());
}

/// Environment matching is exact and case-sensitive
#[tokio::test]
async fn test_branch_matching_is_case_sensitive() {
    let (run, calls) = run_with_mock(
        "Prod",
        &["dev", "prod"],
        MockProvisioner::new(),
        FailurePolicy::FailFast,
    )
    .await;

    assert_eq!(run.target, Target::AllEnvironments);
    assert_eq!(calls, vec!["init(dev)", "plan(dev)", "init(prod)", "plan(prod)"]);
}

/// A failing apply fails the run and carries the provisioner output
#[tokio::test]
async fn test_apply_failure_fails_promotion() {
    let mock = MockProvisioner::new().with(
        "apply(staging)",
        Outcome::Fail("Error: creating bucket: AccessDenied".to_string()),
    );

    let (run, calls) = run_with_mock("staging", &["dev", "staging"], mock, FailurePolicy::FailFast).await;

    assert_run_status(&run, RunStatus::Failed);
    assert_eq!(calls, vec!["init(staging)", "plan(staging)", "apply(staging)"]);
    assert_step_state(&run, "staging", Action::Init, "succeeded");
    assert_step_state(&run, "staging", Action::Plan, "succeeded");
    assert_step_failed(&run, "staging", Action::Apply, "AccessDenied");
}

/// Pending changes on plan are not a failure, and the summary is kept
#[tokio::test]
async fn test_plan_with_changes_still_applies() {
    let mock = MockProvisioner::new().with(
        "plan(prod)",
        Outcome::Changes("Plan: 2 to add, 1 to change, 0 to destroy.".to_string()),
    );

    let (run, calls) = run_with_mock("prod", &["prod"], mock, FailurePolicy::FailFast).await;

    assert_run_status(&run, RunStatus::Succeeded);
    assert_eq!(calls.last().map(String::as_str), Some("apply(prod)"));

    match &run.step("prod", Action::Plan).unwrap().status {
        StepStatus::Succeeded { changes, summary, .. } => {
            assert!(*changes);
            let summary = summary.expect("plan summary should be parsed");
            assert_eq!((summary.to_add, summary.to_change, summary.to_destroy), (2, 1, 0));
        }
        other => panic!("Plan should have succeeded: {:?}", other),
    }
}

/// Running the same branch twice yields the same steps with the same outcome
#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let (first, first_calls) =
        run_with_mock("prod", &["dev", "prod"], MockProvisioner::new(), FailurePolicy::FailFast).await;
    let (second, second_calls) =
        run_with_mock("prod", &["dev", "prod"], MockProvisioner::new(), FailurePolicy::FailFast).await;

    assert_eq!(first.step_ids(), second.step_ids());
    assert_eq!(first_calls, second_calls);
    assert!(first.steps.iter().all(|s| s.is_succeeded()));
    assert!(second.steps.iter().all(|s| s.is_succeeded()));
    assert_ne!(first.run_id, second.run_id);
}
