//! Console reporter

use crate::cli::output::format_run_summary;
use crate::core::PipelineRun;
use crate::reporting::StatusReporter;
use anyhow::Result;

/// Prints the run summary and the tail of the failing step's output
#[derive(Debug, Clone, Default)]
pub struct ConsoleReporter {
    /// Lines of failure output to show (0 = all)
    pub max_output_lines: usize,
}

impl ConsoleReporter {
    pub fn new(max_output_lines: usize) -> Self {
        Self { max_output_lines }
    }
}

#[async_trait::async_trait]
impl StatusReporter for ConsoleReporter {
    fn name(&self) -> &str {
        "console"
    }

    async fn report(&self, run: &PipelineRun) -> Result<()> {
        println!("{}", format_run_summary(run, self.max_output_lines));
        Ok(())
    }
}
