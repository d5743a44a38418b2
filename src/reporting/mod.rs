//! Status reporting - the single pass/fail signal handed back to CI

pub mod console;
pub mod json;

use crate::core::PipelineRun;
use anyhow::Result;

pub use console::ConsoleReporter;
pub use json::{JsonStatusReporter, StatusReport};

/// Trait for status sinks
///
/// Reporters receive the finished run. A reporter error is logged by the
/// engine and never changes the run's outcome.
#[async_trait::async_trait]
pub trait StatusReporter: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Publish the run's pass/fail status
    async fn report(&self, run: &PipelineRun) -> Result<()>;
}
