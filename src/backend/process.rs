//! The process-isolated backend: worker batches in forked child processes.
//!
//! Each child evaluates a contiguous batch of indices and ships its
//! `(index, outcome)` pairs back over a pipe as JSON, then exits without
//! returning into the caller's stack. Predicate closures cannot observe
//! caller-process mutable state: any writes they make land in the child's
//! copy of the address space and die with it. Spawn and serialization
//! dominate the overhead, so indices are batched per worker rather than
//! forked one at a time.

use std::fs::File;
use std::io::{Read, Write};
use std::os::unix::io::FromRawFd;

use super::{chunk_indices, into_ordered, Backend};
use crate::error::Error;
use crate::property::{Property, TrialOutcome};

pub struct ProcessBackend {
    pub workers: usize,
    pub verbose: bool,
}

impl Backend for ProcessBackend {
    fn execute(
        &self,
        property: &Property,
        seed: u64,
        num_runs: u32,
    ) -> Result<Vec<TrialOutcome>, Error> {
        let mut children: Vec<(libc::pid_t, File)> = Vec::new();
        for chunk in chunk_indices(num_runs, self.workers) {
            let mut fds: [libc::c_int; 2] = [0; 2];
            if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
                return Err(Error::Isolation("pipe creation failed".to_string()));
            }
            let (read_fd, write_fd) = (fds[0], fds[1]);
            match unsafe { libc::fork() } {
                -1 => return Err(Error::Isolation("fork failed".to_string())),
                0 => {
                    // Child: evaluate the batch, report, and _exit without
                    // unwinding back into the parent's stack frames.
                    unsafe { libc::close(read_fd) };
                    let mut pipe = unsafe { File::from_raw_fd(write_fd) };
                    let outcomes: Vec<(u32, TrialOutcome)> = chunk
                        .iter()
                        .map(|&index| (index, property.run_trial(seed, index, self.verbose)))
                        .collect();
                    let code = match serde_json::to_vec(&outcomes) {
                        Ok(payload) => match pipe.write_all(&payload) {
                            Ok(()) => 0,
                            Err(_) => 1,
                        },
                        Err(_) => 1,
                    };
                    drop(pipe);
                    unsafe { libc::_exit(code) }
                }
                pid => {
                    unsafe { libc::close(write_fd) };
                    children.push((pid, unsafe { File::from_raw_fd(read_fd) }));
                }
            }
        }

        let mut indexed: Vec<(u32, TrialOutcome)> = Vec::with_capacity(num_runs as usize);
        for (pid, mut pipe) in children {
            let mut payload = Vec::new();
            // Drain the pipe before waiting so a large batch cannot deadlock
            // against a full pipe buffer.
            let read_result = pipe.read_to_end(&mut payload);
            let mut status: libc::c_int = 0;
            unsafe { libc::waitpid(pid, &mut status, 0) };
            read_result
                .map_err(|e| Error::Isolation(format!("reading worker pipe failed: {e}")))?;
            let outcomes: Vec<(u32, TrialOutcome)> =
                serde_json::from_slice(&payload).map_err(|_| {
                    Error::Isolation(format!(
                        "worker process {pid} exited without reporting its batch"
                    ))
                })?;
            indexed.extend(outcomes);
        }
        into_ordered(indexed, num_runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::{integer_in, tuple};
    use crate::backend::SequentialBackend;
    use crate::value::Value;

    #[test]
    fn matches_the_sequential_baseline() {
        let property = Property::new(
            tuple(vec![integer_in(0, 9).unwrap(), integer_in(0, 9).unwrap()]).unwrap(),
            |v| {
                if let Value::Tuple(items) = v {
                    assert!(items[0] != items[1], "pair collided");
                }
            },
        );
        let sequential = SequentialBackend { verbose: false }
            .execute(&property, 8, 25)
            .unwrap();
        let forked = ProcessBackend {
            workers: 3,
            verbose: false,
        }
        .execute(&property, 8, 25)
        .unwrap();
        assert_eq!(sequential, forked);
    }

    #[test]
    fn caller_state_mutations_die_with_the_child() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let touched = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&touched);
        let property = Property::new(integer_in(0, 100).unwrap(), move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let outcomes = ProcessBackend {
            workers: 2,
            verbose: false,
        }
        .execute(&property, 5, 10)
        .unwrap();
        assert_eq!(outcomes.len(), 10);
        // Every increment happened in a forked copy of the address space.
        assert_eq!(touched.load(Ordering::SeqCst), 0);
    }
}
