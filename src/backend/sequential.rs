//! The sequential backend: one trial at a time on the caller's control flow.
//!
//! Baseline for correctness and for environments without concurrency
//! support; the other backends must match its results for any fixed seed.

use super::Backend;
use crate::error::Error;
use crate::property::{Property, TrialOutcome};

pub struct SequentialBackend {
    pub verbose: bool,
}

impl Backend for SequentialBackend {
    fn execute(
        &self,
        property: &Property,
        seed: u64,
        num_runs: u32,
    ) -> Result<Vec<TrialOutcome>, Error> {
        Ok((0..num_runs)
            .map(|index| property.run_trial(seed, index, self.verbose))
            .collect())
    }
}
