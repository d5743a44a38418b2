//! CLI output formatting

use crate::{
    core::{EnvironmentSet, PipelinePlan, PipelineRun, RunStatus, StepStatus, Target},
    execution::ExecutionEvent,
};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");
pub static SKIP: Emoji<'_, '_> = Emoji("⏭️  ", "- ");

/// Create a progress bar over the steps of a run
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    progress.set_style(style);
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Format a step status for display
pub fn format_step_status(status: &StepStatus) -> String {
    match status {
        StepStatus::Pending => style("PENDING").dim().to_string(),
        StepStatus::Running { .. } => style("RUNNING").yellow().to_string(),
        StepStatus::Succeeded { changes: true, .. } => {
            style("SUCCEEDED (changes)").green().to_string()
        }
        StepStatus::Succeeded { .. } => style("SUCCEEDED").green().to_string(),
        StepStatus::Failed { .. } => style("FAILED").red().to_string(),
        StepStatus::Skipped { .. } => style("SKIPPED").dim().to_string(),
    }
}

/// Format a run status for display
pub fn format_status(status: RunStatus) -> String {
    match status {
        RunStatus::Pending => style("PENDING").dim().to_string(),
        RunStatus::Running => style("RUNNING").yellow().to_string(),
        RunStatus::Succeeded => style("SUCCEEDED").green().to_string(),
        RunStatus::Failed => style("FAILED").red().to_string(),
    }
}

/// Format a target for display
pub fn format_target(target: &Target) -> String {
    match target {
        Target::Environment(name) => format!("promote to {}", style(name).bold()),
        Target::AllEnvironments => "validate all environments".to_string(),
    }
}

/// Format an execution event for display
pub fn format_execution_event(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::RunStarted {
            run_id,
            branch,
            target,
            total_steps,
        } => format!(
            "{} Branch {}: {} ({} steps, {})",
            ROCKET,
            style(branch).bold(),
            format_target(target),
            total_steps,
            style(&run_id.to_string()[..8]).dim()
        ),
        ExecutionEvent::StepStarted { step_id } => {
            format!("{} {}", SPINNER, style(step_id).cyan())
        }
        ExecutionEvent::StepSucceeded {
            step_id,
            changes,
            summary,
            ..
        } => match (changes, summary) {
            (true, Some(summary)) => format!(
                "{} {} {}",
                CHECK,
                style(step_id).green(),
                style(summary).yellow()
            ),
            (true, None) => format!(
                "{} {} {}",
                CHECK,
                style(step_id).green(),
                style("(changes)").yellow()
            ),
            _ => format!("{} {}", CHECK, style(step_id).green()),
        },
        ExecutionEvent::StepFailed { step_id, error, .. } => {
            format!("{} {}: {}", CROSS, style(step_id).red(), style(error).dim())
        }
        ExecutionEvent::StepSkipped { step_id, reason } => {
            format!("{} {} ({})", SKIP, style(step_id).dim(), reason)
        }
        ExecutionEvent::RunFinished { run_id, status } => format!(
            "{} Run ({}) {}",
            INFO,
            style(&run_id.to_string()[..8]).dim(),
            format_status(*status)
        ),
    }
}

/// Full provisioner output carried by a finished step, if any
pub fn event_output(event: &ExecutionEvent) -> Option<&str> {
    match event {
        ExecutionEvent::StepSucceeded { output, .. } | ExecutionEvent::StepFailed { output, .. } => {
            Some(output.as_str()).filter(|o| !o.trim().is_empty())
        }
        _ => None,
    }
}

/// Format a resolved plan for display
pub fn format_plan(plan: &PipelinePlan) -> String {
    let mut lines = vec![format!(
        "{} Branch {}: {}",
        INFO,
        style(&plan.branch).bold(),
        format_target(&plan.target)
    )];
    for (i, step) in plan.steps.iter().enumerate() {
        lines.push(format!(
            "  {}. {:<6} {} ({})",
            i + 1,
            step.action,
            style(&step.environment.name).cyan(),
            style(step.environment.dir.display()).dim()
        ));
    }
    if plan.is_mutating() {
        lines.push(format!(
            "{} apply runs with auto-approval",
            WARN
        ));
    }
    lines.join("\n")
}

/// Format the environment listing
pub fn format_environments(environments: &EnvironmentSet) -> String {
    environments
        .iter()
        .map(|env| {
            format!(
                "  {} {}",
                style(&env.name).bold(),
                style(env.dir.display()).dim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the final run summary, including the failing step's output
pub fn format_run_summary(run: &PipelineRun, max_output_lines: usize) -> String {
    let icon = if run.is_success() { CHECK } else { CROSS };
    let mut lines = vec![format!(
        "\n{} Branch {} {} - {} succeeded, {} failed, {} skipped",
        icon,
        style(&run.branch).bold(),
        format_status(run.status),
        run.succeeded_count(),
        run.failed_count(),
        run.skipped_count()
    )];

    if let Some(duration) = run.duration() {
        lines.push(format!("  Duration: {}", style(format_duration(duration)).dim()));
    }

    for step in &run.steps {
        lines.push(format!("  {:<14} {}", step.id(), format_step_status(&step.status)));
    }

    if let Some(failed) = run.failed_step() {
        if let StepStatus::Failed { error, output, .. } = &failed.status {
            lines.push(format!(
                "\n{} {} failed: {}",
                CROSS,
                style(failed.id()).red().bold(),
                error
            ));
            if !output.trim().is_empty() {
                lines.push(format_output(output, max_output_lines));
            }
        }
    }

    lines.join("\n")
}

/// Format step output with truncation (0 = no limit)
pub fn format_output(output: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = output.lines().collect();

    if max_lines == 0 || lines.len() <= max_lines {
        output.to_string()
    } else {
        let truncated = lines[lines.len() - max_lines..].join("\n");
        format!(
            "{}... ({} earlier lines)\n{}",
            style("[truncated]").dim(),
            lines.len() - max_lines,
            truncated
        )
    }
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
