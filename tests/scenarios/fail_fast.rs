//! Test: Fail fast - the first failure skips everything after it

use crate::helpers::*;
use promote::core::{Action, RunStatus, StepStatus};
use promote::execution::FailurePolicy;

/// plan(dev) fails on a feature branch: prod is never touched
#[tokio::test]
async fn test_plan_failure_stops_run() {
    let mock = MockProvisioner::new().with(
        "plan(dev)",
        Outcome::Fail("Error: Reference to undeclared input variable".to_string()),
    );

    let (run, calls) = run_with_mock("feature-x", &["dev", "prod"], mock, FailurePolicy::FailFast).await;

    assert_run_status(&run, RunStatus::Failed);
    assert_eq!(calls, vec!["init(dev)", "plan(dev)"]);

    assert_step_state(&run, "dev", Action::Init, "succeeded");
    assert_step_failed(&run, "dev", Action::Plan, "undeclared input variable");
    assert_step_state(&run, "prod", Action::Init, "skipped");
    assert_step_state(&run, "prod", Action::Plan, "skipped");

    let failed = run.failed_step().unwrap();
    assert_eq!(failed.id(), "plan(dev)");
}

/// A failure in the k-th environment skips exactly the steps after it
#[tokio::test]
async fn test_failure_in_middle_environment() {
    let mock = MockProvisioner::new().failing("init(b)");

    let (run, calls) = run_with_mock("topic", &["a", "b", "c", "d"], mock, FailurePolicy::FailFast).await;

    assert_eq!(calls, vec!["init(a)", "plan(a)", "init(b)"]);
    assert_eq!(run.succeeded_count(), 2);
    assert_eq!(run.failed_count(), 1);
    assert_eq!(run.skipped_count(), 5);

    for step in run.steps.iter().skip(3) {
        match &step.status {
            StepStatus::Skipped { reason } => assert!(reason.contains("init(b)")),
            other => panic!("{} should be skipped: {:?}", step.id(), other),
        }
    }
}

/// A provisioner that cannot be started is a step failure, not a crash
#[tokio::test]
async fn test_unreachable_provisioner_fails_step() {
    let mock = MockProvisioner::new().with("init(dev)", Outcome::Unreachable);

    let (run, calls) = run_with_mock("feature-x", &["dev", "prod"], mock, FailurePolicy::FailFast).await;

    assert_run_status(&run, RunStatus::Failed);
    assert_eq!(calls, vec!["init(dev)"]);
    match &run.step("dev", Action::Init).unwrap().status {
        StepStatus::Failed { error, .. } => assert!(error.contains("provisioner unavailable")),
        other => panic!("init(dev) should have failed: {:?}", other),
    }
}

/// Every step ends terminal and no step is retried
#[tokio::test]
async fn test_no_retries_and_all_steps_terminal() {
    let mock = MockProvisioner::new().failing("plan(prod)");

    let (run, calls) = run_with_mock("prod", &["prod"], mock, FailurePolicy::FailFast).await;

    assert_eq!(calls.iter().filter(|c| *c == "plan(prod)").count(), 1);
    assert!(run.steps.iter().all(|s| s.status.is_terminal()));
    assert_step_state(&run, "prod", Action::Apply, "skipped");
}
