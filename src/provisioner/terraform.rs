//! Terraform CLI subprocess client

use crate::core::config::TerraformConfig;
use crate::provisioner::{ProvisionOutput, Provisioner, ProvisionerError};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// `terraform plan -detailed-exitcode` exit code meaning "changes present"
const PLAN_CHANGES_EXIT_CODE: i32 = 2;

/// Client for executing terraform as a subprocess
#[derive(Debug, Clone)]
pub struct TerraformClient {
    /// Path to terraform executable
    binary: String,

    /// Timeout for each command in seconds
    timeout_secs: u64,
}

impl TerraformClient {
    /// Create a new terraform client
    ///
    /// # Arguments
    /// * `binary` - Path to terraform executable (e.g., "terraform", "/usr/local/bin/terraform")
    /// * `timeout_secs` - Timeout for each command in seconds
    pub fn new(binary: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            binary: binary.into(),
            timeout_secs,
        }
    }

    pub fn from_config(config: &TerraformConfig) -> Self {
        Self::new(config.binary.clone(), config.timeout_secs)
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Run `terraform <args>` in `dir`.
    ///
    /// Exit codes listed in `ok_codes` count as success; the code is returned
    /// together with combined stdout and stderr. The child is killed if the
    /// timeout elapses.
    async fn run(
        &self,
        dir: &Path,
        args: &[&str],
        ok_codes: &[i32],
    ) -> Result<(i32, String), ProvisionerError> {
        let command = format!("terraform {}", args.first().copied().unwrap_or_default());
        debug!(dir = %dir.display(), "Running {} {}", self.binary, args.join(" "));

        let result = timeout(
            Duration::from_secs(self.timeout_secs),
            Command::new(&self.binary)
                .args(args)
                .current_dir(dir)
                .env("TF_IN_AUTOMATION", "1")
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| ProvisionerError::Timeout {
            command: command.clone(),
            secs: self.timeout_secs,
        })?;

        let output = result.map_err(|source| ProvisionerError::Spawn {
            binary: self.binary.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let combined = if stderr.trim().is_empty() {
            stdout.into_owned()
        } else {
            format!("{}\n{}", stdout, stderr)
        };

        match output.status.code() {
            Some(code) if ok_codes.contains(&code) => {
                debug!("{} returned {} bytes of output", command, combined.len());
                Ok((code, combined))
            }
            exit_code => {
                warn!(
                    dir = %dir.display(),
                    "{} exited with {:?}: {}",
                    command,
                    exit_code,
                    stderr.trim()
                );
                Err(ProvisionerError::CommandFailed {
                    command,
                    exit_code,
                    output: combined,
                })
            }
        }
    }
}

#[async_trait]
impl Provisioner for TerraformClient {
    async fn init(&self, dir: &Path) -> Result<ProvisionOutput, ProvisionerError> {
        info!(dir = %dir.display(), "Running terraform init");
        let (_, output) = self
            .run(dir, &["init", "-input=false", "-no-color"], &[0])
            .await?;
        Ok(ProvisionOutput::new(output))
    }

    async fn plan(&self, dir: &Path) -> Result<ProvisionOutput, ProvisionerError> {
        info!(dir = %dir.display(), "Running terraform plan");
        let (code, output) = self
            .run(
                dir,
                &["plan", "-input=false", "-no-color", "-detailed-exitcode"],
                &[0, PLAN_CHANGES_EXIT_CODE],
            )
            .await?;
        Ok(ProvisionOutput::new(output).with_changes(code == PLAN_CHANGES_EXIT_CODE))
    }

    async fn apply(
        &self,
        dir: &Path,
        auto_approve: bool,
    ) -> Result<ProvisionOutput, ProvisionerError> {
        info!(dir = %dir.display(), auto_approve, "Running terraform apply");
        let mut args = vec!["apply", "-input=false", "-no-color"];
        if auto_approve {
            args.push("-auto-approve");
        }
        let (_, output) = self.run(dir, &args, &[0]).await?;
        Ok(ProvisionOutput::new(output))
    }

    async fn destroy(&self, dir: &Path) -> Result<ProvisionOutput, ProvisionerError> {
        warn!(dir = %dir.display(), "Running terraform destroy");
        let (_, output) = self
            .run(
                dir,
                &["destroy", "-input=false", "-no-color", "-auto-approve"],
                &[0],
            )
            .await?;
        Ok(ProvisionOutput::new(output))
    }
}
