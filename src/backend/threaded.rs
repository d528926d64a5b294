//! The shared-memory backend: a bounded set of worker threads inside one
//! process.
//!
//! Predicate closures may observe or mutate state outside the generated
//! value at the caller's own risk; that is documented caller responsibility,
//! not engine-enforced isolation. A failure inside one worker is caught at
//! the trial boundary and attached to its index, never aborting the batch.

use std::sync::mpsc;
use std::thread;

use tracing::error;

use super::{chunk_indices, into_ordered, Backend};
use crate::error::Error;
use crate::property::{Property, TrialOutcome};

pub struct ThreadedBackend {
    pub workers: usize,
    pub verbose: bool,
    /// Emit a per-worker error log for every failing trial.
    pub report_on_exception: bool,
}

impl Backend for ThreadedBackend {
    fn execute(
        &self,
        property: &Property,
        seed: u64,
        num_runs: u32,
    ) -> Result<Vec<TrialOutcome>, Error> {
        let chunks = chunk_indices(num_runs, self.workers);
        let (tx, rx) = mpsc::channel();
        thread::scope(|scope| {
            for chunk in &chunks {
                let tx = tx.clone();
                scope.spawn(move || {
                    for &index in chunk {
                        let outcome = property.run_trial(seed, index, self.verbose);
                        if self.report_on_exception {
                            if let TrialOutcome::Fail { kind, message, .. } = &outcome {
                                error!(
                                    index,
                                    kind = kind.as_str(),
                                    message = message.as_str(),
                                    "trial failed in worker thread"
                                );
                            }
                        }
                        let _ = tx.send((index, outcome));
                    }
                });
            }
        });
        drop(tx);
        into_ordered(rx.into_iter().collect(), num_runs)
    }
}
