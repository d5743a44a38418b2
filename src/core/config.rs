//! Promotion configuration from YAML

use crate::core::error::ConfigError;
use crate::execution::FailurePolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "promote.yaml";

/// Top-level configuration loaded from `promote.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PromoteConfig {
    /// Directory whose subdirectories are the environments
    #[serde(default = "default_environments_dir")]
    pub environments_dir: PathBuf,

    /// What to do after a step fails
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Optional path for the JSON status report
    #[serde(default)]
    pub status_file: Option<PathBuf>,

    /// Provisioner settings
    #[serde(default)]
    pub terraform: TerraformConfig,
}

/// Settings for the terraform binary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerraformConfig {
    /// Path to terraform executable
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Timeout for each terraform command (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_environments_dir() -> PathBuf {
    PathBuf::from("environments")
}

fn default_binary() -> String {
    std::env::var("TERRAFORM_BIN").unwrap_or_else(|_| "terraform".to_string())
}

fn default_timeout_secs() -> u64 {
    1800 // 30 minutes
}

impl Default for TerraformConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PromoteConfig {
    fn default() -> Self {
        Self {
            environments_dir: default_environments_dir(),
            failure_policy: FailurePolicy::default(),
            status_file: None,
            terraform: TerraformConfig::default(),
        }
    }
}

impl PromoteConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: PromoteConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else `promote.yaml` when present, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.terraform.binary.trim().is_empty() {
            return Err(ConfigError::Invalid("terraform.binary must not be empty".to_string()));
        }
        if self.terraform.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "terraform.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.environments_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("environments_dir must not be empty".to_string()));
        }
        Ok(())
    }
}
