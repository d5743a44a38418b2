//! Environment domain model

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A named configuration unit backed by a directory (e.g. `environments/dev`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Environment name, also the name of the branch that promotes into it
    pub name: String,

    /// Working directory handed to the provisioner
    pub dir: PathBuf,
}

impl Environment {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
        }
    }
}

/// Ordered, non-empty set of known environments with unique names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentSet {
    environments: Vec<Environment>,
}

impl EnvironmentSet {
    /// Build a set from environments in the given order
    pub fn new(environments: Vec<Environment>) -> Result<Self, ConfigError> {
        if environments.is_empty() {
            return Err(ConfigError::NoEnvironments);
        }

        let mut seen = HashSet::new();
        for env in &environments {
            if env.name.is_empty() {
                return Err(ConfigError::InvalidEnvironmentName(env.name.clone()));
            }
            if !seen.insert(env.name.as_str()) {
                return Err(ConfigError::DuplicateEnvironment(env.name.clone()));
            }
        }

        Ok(Self { environments })
    }

    /// Discover environments as the subdirectories of `root`, sorted by name.
    ///
    /// Hidden directories (leading `.`) are ignored, as are plain files.
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        let entries = std::fs::read_dir(root).map_err(|source| ConfigError::EnvironmentsDir {
            path: root.to_path_buf(),
            source,
        })?;

        let mut environments = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ConfigError::EnvironmentsDir {
                path: root.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                debug!("Skipping non UTF-8 directory name: {}", path.display());
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            environments.push(Environment::new(name, path));
        }

        environments.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(
            "Discovered {} environment(s) under {}",
            environments.len(),
            root.display()
        );

        Self::new(environments)
    }

    /// Exact, case-sensitive lookup by name
    pub fn get(&self, name: &str) -> Option<&Environment> {
        self.environments.iter().find(|env| env.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Environment> {
        self.environments.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.environments.iter().map(|env| env.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }
}

impl<'a> IntoIterator for &'a EnvironmentSet {
    type Item = &'a Environment;
    type IntoIter = std::slice::Iter<'a, Environment>;

    fn into_iter(self) -> Self::IntoIter {
        self.environments.iter()
    }
}
