//! The trial runner: orchestration, reduction, and report assembly.
//!
//! The runner derives per-index sub-streams from one seed, hands the full
//! index range to the configured backend, and reduces the outcomes by index
//! order — never by completion time. When a failure exists, the value at the
//! earliest failing index is re-derived from its sub-stream and the shrinker
//! runs sequentially from there, regardless of which backend found the
//! failure. That split is what keeps the result identical across backends
//! for a fixed seed.

use tracing::{debug, info};

use crate::arbitrary::Arbitrary;
use crate::backend::{self, Backend};
use crate::config::{self, RunConfiguration};
use crate::error::Error;
use crate::property::{Property, TrialOutcome};
use crate::random;
use crate::report::RunReport;
use crate::shrinker::{self, ShrinkPath};
use crate::value::Value;

pub struct Runner {
    config: RunConfiguration,
    backend: Box<dyn Backend>,
}

impl Runner {
    /// Validate the configuration and select the execution backend.
    pub fn new(config: RunConfiguration) -> Result<Self, Error> {
        config.validate()?;
        let backend = backend::for_method(&config)?;
        Ok(Runner { config, backend })
    }

    pub fn config(&self) -> &RunConfiguration {
        &self.config
    }

    /// Execute one full run of the property and assemble its report.
    ///
    /// The runner blocks until the backend has returned an outcome for every
    /// dispatched index; outcomes past the earliest failing index are
    /// discarded during reduction.
    pub fn run(&self, property: &Property) -> Result<RunReport, Error> {
        let seed = self.config.seed.unwrap_or_else(random::fresh_seed);
        debug!(
            seed,
            num_runs = self.config.num_runs,
            method = ?self.config.concurrency_method,
            "starting run"
        );
        let outcomes = self
            .backend
            .execute(property, seed, self.config.num_runs)?;

        let mut first_failure: Option<(u32, String, String)> = None;
        for (index, outcome) in outcomes.iter().enumerate() {
            if let TrialOutcome::Fail { kind, message, .. } = outcome {
                first_failure = Some((index as u32, kind.clone(), message.clone()));
                break;
            }
        }

        let effective = first_failure
            .as_ref()
            .map_or(self.config.num_runs, |(index, ..)| index + 1);
        let trial_values: Vec<Value> = if self.config.verbose {
            outcomes
                .iter()
                .take(effective as usize)
                .filter_map(|outcome| outcome.value().cloned())
                .collect()
        } else {
            Vec::new()
        };

        match first_failure {
            None => {
                info!(seed, runs = effective, "property held");
                Ok(RunReport {
                    failed: false,
                    num_runs: effective,
                    num_shrinks: 0,
                    seed,
                    counterexample: None,
                    counterexample_path: None,
                    error_message: None,
                    error_kind: None,
                    failures: Vec::new(),
                    verbose: self.config.verbose,
                    trial_values,
                    run_configuration: self.config.clone(),
                })
            }
            Some((index, kind, message)) => {
                // Re-derive the failing value from its sub-stream; generation
                // purity guarantees this matches what the backend evaluated.
                let original = property.generate_at(seed, index);
                info!(seed, index, value = %original, "property falsified; shrinking");
                let shrunk = shrinker::shrink(property, original, kind, message);
                Ok(RunReport {
                    failed: true,
                    num_runs: effective,
                    num_shrinks: shrunk.num_shrinks,
                    seed,
                    counterexample_path: Some(ShrinkPath {
                        trial_index: index,
                        choices: shrunk.choices,
                    }),
                    counterexample: Some(shrunk.value),
                    error_message: Some(shrunk.message),
                    error_kind: Some(shrunk.kind),
                    failures: shrunk.failures,
                    verbose: self.config.verbose,
                    trial_values,
                    run_configuration: self.config.clone(),
                })
            }
        }
    }
}

/// Check a shared-closure predicate against an arbitrary using the
/// process-wide default configuration.
pub fn forall<F>(arbitrary: Arbitrary, predicate: F) -> Result<RunReport, Error>
where
    F: Fn(&Value) + Send + Sync + 'static,
{
    Runner::new(config::default_configuration())?.run(&Property::new(arbitrary, predicate))
}
