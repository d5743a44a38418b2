use anyhow::{bail, Context, Result};
use promote::cli::commands::{DestroyCommand, ListCommand, PlanCommand, RunCommand, TargetArgs};
use promote::cli::output::*;
use promote::cli::{Cli, Command};
use promote::core::config::PromoteConfig;
use promote::core::{ConfigError, EnvironmentSet, PipelinePlan};
use promote::execution::{ExecutionEngine, ExecutionEvent, FailurePolicy};
use promote::provisioner::{Provisioner, TerraformClient};
use promote::reporting::{ConsoleReporter, JsonStatusReporter, StatusReport};
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Tail of the failing step's output repeated in the final summary.
/// The full output is printed as each step finishes.
const FAILURE_OUTPUT_LINES: usize = 40;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let config = PromoteConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Execute command
    let passed = match &cli.command {
        Command::Run(cmd) => run_pipeline(cmd, config).await?,
        Command::Plan(cmd) => show_plan(cmd, &config)?,
        Command::List(cmd) => list_environments(cmd, &config)?,
        Command::Destroy(cmd) => destroy_environment(cmd, &config).await?,
    };

    if !passed {
        std::process::exit(1);
    }

    Ok(())
}

fn discover(dir: Option<&Path>, config: &PromoteConfig) -> Result<EnvironmentSet, ConfigError> {
    let root = dir.unwrap_or(config.environments_dir.as_path());
    EnvironmentSet::discover(root)
}

/// Resolve branch and environments; a missing branch is an empty one
fn resolve(target: &TargetArgs, config: &PromoteConfig) -> Result<PipelinePlan> {
    let environments = discover(target.environments_dir.as_deref(), config)?;
    let branch = target.branch.clone().unwrap_or_default();
    let plan = PipelinePlan::resolve(&branch, &environments)
        .context("Refusing to run (set the branch with --branch or BRANCH_NAME)")?;
    Ok(plan)
}

async fn run_pipeline(cmd: &RunCommand, mut config: PromoteConfig) -> Result<bool> {
    if let Some(binary) = &cmd.terraform {
        config.terraform.binary = binary.clone();
    }
    if let Some(timeout_secs) = cmd.timeout_secs {
        config.terraform.timeout_secs = timeout_secs;
    }
    if cmd.continue_on_failure {
        config.failure_policy = FailurePolicy::ContinueOnFailure;
    }
    if let Some(path) = &cmd.status_file {
        config.status_file = Some(path.clone());
    }
    let plan = match config
        .validate()
        .map_err(anyhow::Error::from)
        .and_then(|_| resolve(&cmd.target, &config))
    {
        Ok(plan) => plan,
        Err(e) => {
            // A refused run must not leave a previous run's status behind
            if let Some(path) = &config.status_file {
                let branch = cmd.target.branch.as_deref().unwrap_or_default();
                if let Err(write_err) = JsonStatusReporter::new(path)
                    .report_refused(branch, format!("{:#}", e))
                    .await
                {
                    error!("Failed to write status file: {:#}", write_err);
                }
            }
            return Err(e);
        }
    };
    info!(
        "Resolved branch {} to {} step(s), policy {:?}",
        plan.branch,
        plan.len(),
        config.failure_policy
    );

    let provisioner = TerraformClient::from_config(&config.terraform);
    let mut engine = ExecutionEngine::new(provisioner, config.failure_policy);

    if let Some(path) = &config.status_file {
        engine.add_reporter(JsonStatusReporter::new(path));
    }

    // Set up event handler for console output
    let progress = if cmd.json {
        None
    } else {
        engine.add_reporter(ConsoleReporter::new(FAILURE_OUTPUT_LINES));
        let progress = create_progress_bar(plan.len());
        let bar = progress.clone();
        engine.add_event_handler(move |event| {
            bar.suspend(|| {
                println!("{}", format_execution_event(event));
                if let Some(output) = event_output(event) {
                    println!("{}", output.trim_end());
                }
            });
            match event {
                ExecutionEvent::StepStarted { step_id } => bar.set_message(step_id.clone()),
                ExecutionEvent::StepSucceeded { .. }
                | ExecutionEvent::StepFailed { .. }
                | ExecutionEvent::StepSkipped { .. } => bar.inc(1),
                _ => {}
            }
        });
        Some(progress)
    };

    let run = engine.run_plan(&plan).await;

    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    if cmd.json {
        let report = StatusReport::from_run(&run);
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if !run.is_success() {
        error!("Branch {} failed promotion checks", run.branch);
    }

    Ok(run.is_success())
}

fn show_plan(cmd: &PlanCommand, config: &PromoteConfig) -> Result<bool> {
    let plan = resolve(&cmd.target, config)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        println!("{}", format_plan(&plan));
    }

    Ok(true)
}

fn list_environments(cmd: &ListCommand, config: &PromoteConfig) -> Result<bool> {
    let environments = discover(cmd.environments_dir.as_deref(), config)?;

    if cmd.json {
        let data = serde_json::json!({ "environments": environments.iter().collect::<Vec<_>>() });
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        println!("{} Environments:", INFO);
        println!("{}", format_environments(&environments));
    }

    Ok(true)
}

async fn destroy_environment(cmd: &DestroyCommand, config: &PromoteConfig) -> Result<bool> {
    let environments = discover(cmd.environments_dir.as_deref(), config)?;
    let env = environments
        .get(&cmd.environment)
        .ok_or_else(|| ConfigError::UnknownEnvironment(cmd.environment.clone()))?;

    if !cmd.yes {
        bail!(
            "Refusing to destroy {} without --yes",
            env.name
        );
    }

    println!(
        "{} Destroying {} ({})",
        WARN,
        style(&env.name).red().bold(),
        style(env.dir.display()).dim()
    );

    let terraform = TerraformClient::from_config(&config.terraform);
    let result = match terraform.init(&env.dir).await {
        Ok(_) => terraform.destroy(&env.dir).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(out) => {
            println!("{}", out.output);
            println!("{} {} destroyed", CHECK, style(&env.name).bold());
            Ok(true)
        }
        Err(e) => {
            println!("{} {}", CROSS, style(&e).red());
            if !e.output().trim().is_empty() {
                println!("{}", format_output(e.output(), FAILURE_OUTPUT_LINES));
            }
            Ok(false)
        }
    }
}
