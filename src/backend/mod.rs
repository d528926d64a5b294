//! Execution backends: interchangeable strategies for evaluating a batch of
//! trial indices.
//!
//! A backend is purely a performance and isolation trade-off. Every
//! implementation calls `Property::run_trial` per index, so for a fixed seed
//! all four produce identical outcomes; the runner's index-ordered reduction
//! does the rest.

use crate::config::{ConcurrencyMethod, RunConfiguration};
use crate::error::Error;
use crate::property::{Property, TrialOutcome};

mod actor;
#[cfg(unix)]
mod process;
mod sequential;
mod threaded;

pub use actor::ActorBackend;
#[cfg(unix)]
pub use process::ProcessBackend;
pub use sequential::SequentialBackend;
pub use threaded::ThreadedBackend;

pub trait Backend {
    /// Evaluate trial indices `0..num_runs` and return one outcome per
    /// index, in index order. Implementations must not reorder, drop, or
    /// duplicate indices, and must contain each trial's failure locally;
    /// one trial's panic never corrupts a sibling's result.
    fn execute(
        &self,
        property: &Property,
        seed: u64,
        num_runs: u32,
    ) -> Result<Vec<TrialOutcome>, Error>;
}

/// Select the backend implementation for a configuration snapshot.
pub fn for_method(config: &RunConfiguration) -> Result<Box<dyn Backend>, Error> {
    match config.concurrency_method {
        ConcurrencyMethod::Sequential => Ok(Box::new(SequentialBackend {
            verbose: config.verbose,
        })),
        ConcurrencyMethod::Threads => Ok(Box::new(ThreadedBackend {
            workers: config.workers,
            verbose: config.verbose,
            report_on_exception: config.thread_report_on_exception,
        })),
        ConcurrencyMethod::Processes => process_backend(config),
        ConcurrencyMethod::Actors => Ok(Box::new(ActorBackend {
            workers: config.workers,
            verbose: config.verbose,
        })),
    }
}

#[cfg(unix)]
fn process_backend(config: &RunConfiguration) -> Result<Box<dyn Backend>, Error> {
    Ok(Box::new(ProcessBackend {
        workers: config.workers,
        verbose: config.verbose,
    }))
}

#[cfg(not(unix))]
fn process_backend(_config: &RunConfiguration) -> Result<Box<dyn Backend>, Error> {
    Err(Error::Unsupported(
        "the process backend requires a Unix target".to_string(),
    ))
}

/// Split `0..num_runs` into at most `workers` contiguous chunks. Batching
/// many indices per worker is what keeps per-unit spawn overhead amortized.
fn chunk_indices(num_runs: u32, workers: usize) -> Vec<Vec<u32>> {
    let workers = workers.max(1);
    let per_chunk = ((num_runs as usize) + workers - 1) / workers;
    (0..num_runs)
        .collect::<Vec<u32>>()
        .chunks(per_chunk.max(1))
        .map(<[u32]>::to_vec)
        .collect()
}

/// Order indexed outcomes and verify the batch covers exactly `0..num_runs`.
fn into_ordered(
    mut outcomes: Vec<(u32, TrialOutcome)>,
    num_runs: u32,
) -> Result<Vec<TrialOutcome>, Error> {
    outcomes.sort_by_key(|(index, _)| *index);
    let complete = outcomes.len() == num_runs as usize
        && outcomes
            .iter()
            .enumerate()
            .all(|(position, (index, _))| *index == position as u32);
    if !complete {
        return Err(Error::Invariant(
            "backend returned an incomplete or duplicated batch".to_string(),
        ));
    }
    Ok(outcomes.into_iter().map(|(_, outcome)| outcome).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunking_covers_every_index_once() {
        for (num_runs, workers) in [(10u32, 4usize), (3, 8), (100, 1), (1, 1), (7, 7)] {
            let chunks = chunk_indices(num_runs, workers);
            assert!(chunks.len() <= workers);
            let flattened: Vec<u32> = chunks.into_iter().flatten().collect();
            assert_eq!(flattened, (0..num_runs).collect::<Vec<u32>>());
        }
    }

    #[test]
    fn into_ordered_sorts_by_index() {
        let outcomes = vec![
            (2, TrialOutcome::Pass { value: None }),
            (0, TrialOutcome::Pass { value: None }),
            (1, TrialOutcome::Pass { value: None }),
        ];
        assert_eq!(into_ordered(outcomes, 3).unwrap().len(), 3);
    }

    #[test]
    fn into_ordered_rejects_dropped_indices() {
        let outcomes = vec![
            (0, TrialOutcome::Pass { value: None }),
            (2, TrialOutcome::Pass { value: None }),
        ];
        assert!(matches!(
            into_ordered(outcomes, 3),
            Err(Error::Invariant(_))
        ));
    }
}
