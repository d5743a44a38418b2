//! Plan summary parsing

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Resource counts from terraform's `Plan: ...` line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub to_add: u32,
    pub to_change: u32,
    pub to_destroy: u32,
}

fn plan_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Plan: (\d+) to add, (\d+) to change, (\d+) to destroy")
            .expect("plan summary regex is valid")
    })
}

impl PlanSummary {
    /// Extract the summary from plan output.
    ///
    /// Returns a zero summary for "No changes." and `None` when the output
    /// carries neither line.
    pub fn parse(output: &str) -> Option<Self> {
        if let Some(caps) = plan_line().captures(output) {
            let count = |i: usize| caps[i].parse().unwrap_or(0);
            return Some(Self {
                to_add: count(1),
                to_change: count(2),
                to_destroy: count(3),
            });
        }

        if output.contains("No changes.") {
            return Some(Self::default());
        }

        None
    }

    pub fn is_empty(&self) -> bool {
        self.to_add == 0 && self.to_change == 0 && self.to_destroy == 0
    }
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "+{} ~{} -{}",
            self.to_add, self.to_change, self.to_destroy
        )
    }
}
