//! The immutable result aggregate of one run.

use serde::{Deserialize, Serialize};

use crate::config::RunConfiguration;
use crate::shrinker::ShrinkPath;
use crate::value::Value;

/// Everything a caller learns from one run. Assembled once by the trial
/// runner and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub failed: bool,
    /// Effective trial count: the index of the first failure plus one, or the
    /// requested count when nothing failed.
    pub num_runs: u32,
    /// Shrink rounds that advanced the counterexample.
    pub num_shrinks: u32,
    /// The seed that reproduces this run.
    pub seed: u64,
    pub counterexample: Option<Value>,
    pub counterexample_path: Option<ShrinkPath>,
    pub error_message: Option<String>,
    pub error_kind: Option<String>,
    /// Every failing value observed: the original counterexample followed by
    /// each intermediate accepted while shrinking.
    pub failures: Vec<Value>,
    pub verbose: bool,
    /// Every trial's generated value, recorded only under verbose runs.
    pub trial_values: Vec<Value>,
    /// The configuration snapshot this run used.
    pub run_configuration: RunConfiguration,
}

impl RunReport {
    /// The rendered counterexample path, e.g. `"2:1"`.
    pub fn path_string(&self) -> Option<String> {
        self.counterexample_path.as_ref().map(ShrinkPath::to_string)
    }

    /// A single synthesized failure message carrying everything needed to
    /// reproduce: seed, counterexample, path, and the predicate's error.
    pub fn failure_message(&self) -> Option<String> {
        if !self.failed {
            return None;
        }
        let counterexample = self
            .counterexample
            .as_ref()
            .map_or_else(|| "<none>".to_string(), Value::to_string);
        let path = self.path_string().unwrap_or_default();
        let kind = self.error_kind.as_deref().unwrap_or("unknown");
        let message = self.error_message.as_deref().unwrap_or("");
        Some(format!(
            "property failed after {} run(s) and {} shrink(s)\n  seed: {}\n  counterexample: {}\n  path: {}\n  error: {} ({})",
            self.num_runs, self.num_shrinks, self.seed, counterexample, path, message, kind,
        ))
    }

    /// Re-raise a failed run as a host-level panic, for use inside test
    /// functions. Passing runs return silently.
    pub fn assert_passed(&self) {
        if let Some(message) = self.failure_message() {
            panic!("{message}");
        }
    }
}
