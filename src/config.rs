//! Run configuration and the process-wide defaults cell.
//!
//! A `RunConfiguration` is an immutable snapshot taken when a run starts.
//! The defaults cell supplies one when the caller does not pass an override;
//! it may be updated between runs, and the snapshot semantics guarantee an
//! in-flight run never observes a mid-run change.

use std::sync::{OnceLock, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How a batch of trial indices is executed. Purely a performance and
/// isolation trade-off: for a fixed seed every method produces the same
/// report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcurrencyMethod {
    /// One trial at a time on the caller's control flow.
    Sequential,
    /// Shared-memory worker threads inside this process.
    Threads,
    /// Forked worker processes; outcomes return over a serialization channel.
    Processes,
    /// Isolated units with no shared mutable state; message passing only.
    Actors,
}

impl Default for ConcurrencyMethod {
    fn default() -> Self {
        ConcurrencyMethod::Sequential
    }
}

/// Options recognized by the trial runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfiguration {
    /// Trials to attempt when none fails.
    pub num_runs: u32,
    /// Seed for the whole run; `None` means freshly generated at run start.
    pub seed: Option<u64>,
    pub concurrency_method: ConcurrencyMethod,
    /// Worker count for the concurrent methods.
    pub workers: usize,
    /// Record every trial's value, not just failures.
    pub verbose: bool,
    /// Emit a per-worker error log for each failing trial in the threaded
    /// backend.
    pub thread_report_on_exception: bool,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        RunConfiguration {
            num_runs: 100,
            seed: None,
            concurrency_method: ConcurrencyMethod::Sequential,
            workers: 4,
            verbose: false,
            thread_report_on_exception: false,
        }
    }
}

impl RunConfiguration {
    pub fn validate(&self) -> Result<(), Error> {
        if self.num_runs == 0 {
            return Err(Error::Config("num_runs must be at least 1".to_string()));
        }
        if self.workers == 0 {
            return Err(Error::Config("workers must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn with_num_runs(mut self, num_runs: u32) -> Self {
        self.num_runs = num_runs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_concurrency_method(mut self, method: ConcurrencyMethod) -> Self {
        self.concurrency_method = method;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_thread_report_on_exception(mut self, report: bool) -> Self {
        self.thread_report_on_exception = report;
        self
    }
}

fn defaults_cell() -> &'static RwLock<RunConfiguration> {
    static CELL: OnceLock<RwLock<RunConfiguration>> = OnceLock::new();
    CELL.get_or_init(|| RwLock::new(RunConfiguration::default()))
}

/// Snapshot the process-wide default configuration.
pub fn default_configuration() -> RunConfiguration {
    defaults_cell()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Replace the process-wide default configuration. Runs already in flight
/// keep the snapshot they started with.
pub fn set_default_configuration(config: RunConfiguration) -> Result<(), Error> {
    config.validate()?;
    let mut cell = defaults_cell()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *cell = config;
    Ok(())
}
