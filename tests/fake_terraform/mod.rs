//! Scripted stand-in for the terraform binary, shared by integration tests
#![allow(dead_code)]

use promote::core::EnvironmentSet;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;

/// Behaves like terraform, driven by marker files in the working directory:
/// `changes` makes plan exit 2, `broken` fails every command, `noisy` fails
/// with 60 numbered error lines, `slow` hangs.
const FAKE_TERRAFORM: &str = r#"#!/bin/sh
echo "$@" >> ../calls.log
if [ -f broken ]; then
  echo "Error: Unsupported block type" >&2
  echo "  on main.tf line 3" >&2
  exit 1
fi
if [ -f noisy ]; then
  i=1
  while [ $i -le 60 ]; do
    echo "Error line $i" >&2
    i=$((i + 1))
  done
  exit 1
fi
if [ -f slow ]; then
  sleep 5
fi
case "$1" in
  init)
    echo "Terraform has been successfully initialized!"
    ;;
  plan)
    if [ -f changes ]; then
      echo "  + google_storage_bucket.state will be created"
      echo "Plan: 1 to add, 0 to change, 0 to destroy."
      exit 2
    fi
    echo "No changes. Your infrastructure matches the configuration."
    ;;
  apply)
    echo "Apply complete! Resources: 1 added, 0 changed, 0 destroyed."
    ;;
  destroy)
    echo "Destroy complete! Resources: 1 destroyed."
    ;;
  *)
    echo "unknown command $1" >&2
    exit 127
    ;;
esac
"#;

/// Write the fake binary once per test process
pub fn fake_terraform() -> &'static Path {
    static BINARY: OnceLock<PathBuf> = OnceLock::new();
    BINARY.get_or_init(|| {
        let dir = Box::leak(Box::new(TempDir::new().unwrap()));
        let path = dir.path().join("terraform");
        fs::write(&path, FAKE_TERRAFORM).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    })
}

/// Root holding one directory per environment
pub struct Workspace {
    root: TempDir,
}

impl Workspace {
    /// `envs` pairs an environment name with space-separated marker files
    pub fn new(envs: &[(&str, &str)]) -> Self {
        let root = TempDir::new().unwrap();
        for (name, markers) in envs {
            let dir = root.path().join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("main.tf"), "").unwrap();
            for marker in markers.split_whitespace() {
                fs::write(dir.join(marker), "").unwrap();
            }
        }
        Self { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn dir(&self, env: &str) -> PathBuf {
        self.root.path().join(env)
    }

    pub fn environments(&self) -> EnvironmentSet {
        EnvironmentSet::discover(self.root.path()).unwrap()
    }

    /// Argument lines the fake binary saw, in order
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.root.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
