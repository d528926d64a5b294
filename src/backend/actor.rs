//! The actor-isolated backend: units with no shared mutable state.
//!
//! Each unit receives only values that are independently transferable — its
//! own clone of the arbitrary, a capture-free predicate function pointer,
//! the seed, and its index batch — and communicates results exclusively over
//! a message channel. The transferable-only constraint is enforced at
//! construction time: a property built from a shared closure is rejected
//! here before any unit spawns, as a usage error distinct from a predicate
//! failure.

use std::sync::mpsc;
use std::thread;

use super::{chunk_indices, into_ordered, Backend};
use crate::error::Error;
use crate::property::{Property, TrialOutcome};

pub struct ActorBackend {
    pub workers: usize,
    pub verbose: bool,
}

impl Backend for ActorBackend {
    fn execute(
        &self,
        property: &Property,
        seed: u64,
        num_runs: u32,
    ) -> Result<Vec<TrialOutcome>, Error> {
        let Some(predicate) = property.isolated_fn() else {
            return Err(Error::Isolation(
                "actor backend requires a property built with Property::isolated; \
                 a shared closure cannot cross the actor boundary"
                    .to_string(),
            ));
        };
        let (tx, rx) = mpsc::channel();
        let mut units = Vec::new();
        for chunk in chunk_indices(num_runs, self.workers) {
            let tx = tx.clone();
            let arbitrary = property.arbitrary().clone();
            let verbose = self.verbose;
            units.push(thread::spawn(move || {
                let local = Property::isolated(arbitrary, predicate);
                for index in chunk {
                    let _ = tx.send((index, local.run_trial(seed, index, verbose)));
                }
            }));
        }
        drop(tx);
        let indexed: Vec<(u32, TrialOutcome)> = rx.into_iter().collect();
        for unit in units {
            unit.join().map_err(|_| {
                Error::Isolation("actor unit aborted before reporting its batch".to_string())
            })?;
        }
        into_ordered(indexed, num_runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::integer_in;
    use crate::backend::SequentialBackend;
    use crate::value::Value;

    fn reject_negative(v: &Value) {
        if let Value::Int(n) = v {
            assert!(*n >= 0, "negative: {n}");
        }
    }

    #[test]
    fn matches_the_sequential_baseline() {
        let property = Property::isolated(integer_in(-100, 100).unwrap(), reject_negative);
        let sequential = SequentialBackend { verbose: false }
            .execute(&property, 17, 30)
            .unwrap();
        let isolated = ActorBackend {
            workers: 4,
            verbose: false,
        }
        .execute(&property, 17, 30)
        .unwrap();
        assert_eq!(sequential, isolated);
    }

    #[test]
    fn shared_closures_are_rejected_before_spawning() {
        let property = Property::new(integer_in(0, 10).unwrap(), |_| {});
        let result = ActorBackend {
            workers: 2,
            verbose: false,
        }
        .execute(&property, 1, 10);
        assert!(matches!(result, Err(Error::Isolation(_))));
    }
}
