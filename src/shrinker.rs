//! The shrinker engine: bounded, path-tracked reduction of a failing value.
//!
//! Always runs on the caller's own control flow, never inside a backend's
//! parallel units: each round depends on the previous round's outcome. Per
//! round the arbitrary's candidates are evaluated in order and the first one
//! that still fails becomes the new current value; a round with no failing
//! candidate terminates the search. A hard round and evaluation budget
//! bounds total work on pathological shrink functions.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::arbitrary::Arbitrary;
use crate::property::Property;
use crate::value::Value;

/// Rounds the engine will attempt before giving up.
pub const MAX_SHRINK_ROUNDS: u32 = 1_000;
/// Predicate evaluations the engine will spend before giving up.
pub const MAX_SHRINK_EVALS: u32 = 10_000;

/// Positional trace of a shrink: the 0-based failing trial index followed by
/// the 0-based candidate index accepted at each round. Rendered
/// colon-separated, e.g. `2:1`. Re-walking the choices from the original
/// counterexample reproduces the final value exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShrinkPath {
    pub trial_index: u32,
    pub choices: Vec<usize>,
}

impl fmt::Display for ShrinkPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.trial_index)?;
        for choice in &self.choices {
            write!(f, ":{choice}")?;
        }
        Ok(())
    }
}

/// Result of one shrink search.
#[derive(Debug, Clone)]
pub struct ShrinkOutcome {
    /// The minimal failing value found.
    pub value: Value,
    /// Rounds that advanced the current value.
    pub num_shrinks: u32,
    /// Accepted candidate index per advancing round.
    pub choices: Vec<usize>,
    /// Every failing value observed, in order: the original counterexample
    /// followed by each accepted candidate.
    pub failures: Vec<Value>,
    /// Failure kind and message of the final counterexample.
    pub kind: String,
    pub message: String,
}

/// Reduce `initial` (a known-failing value of the property) to a minimal
/// counterexample. `kind` and `message` describe the original failure and
/// are replaced by each accepted candidate's failure details.
pub fn shrink(property: &Property, initial: Value, kind: String, message: String) -> ShrinkOutcome {
    let mut outcome = ShrinkOutcome {
        failures: vec![initial.clone()],
        value: initial,
        num_shrinks: 0,
        choices: Vec::new(),
        kind,
        message,
    };
    let mut evals: u32 = 0;

    'rounds: loop {
        if outcome.num_shrinks >= MAX_SHRINK_ROUNDS {
            warn!(
                rounds = outcome.num_shrinks,
                "shrink round budget exhausted; returning best-known counterexample"
            );
            break;
        }
        let candidates = property.arbitrary().shrink(&outcome.value);
        let mut advanced = false;
        for (index, candidate) in candidates.into_iter().enumerate() {
            if evals >= MAX_SHRINK_EVALS {
                warn!(
                    evals,
                    "shrink evaluation budget exhausted; returning best-known counterexample"
                );
                break 'rounds;
            }
            evals += 1;
            if let Some(failure) = property.evaluate(&candidate) {
                debug!(round = outcome.num_shrinks + 1, candidate = index, value = %candidate, "shrink advanced");
                outcome.choices.push(index);
                outcome.failures.push(candidate.clone());
                outcome.value = candidate;
                outcome.kind = failure.kind;
                outcome.message = failure.message;
                outcome.num_shrinks += 1;
                advanced = true;
                break;
            }
        }
        if !advanced {
            break;
        }
    }
    outcome
}

/// Re-walk recorded candidate choices from the original counterexample using
/// only the arbitrary's shrink function. Returns `None` if the path does not
/// fit the value, which means it was recorded against a different arbitrary.
pub fn replay(arbitrary: &Arbitrary, original: &Value, choices: &[usize]) -> Option<Value> {
    let mut current = original.clone();
    for &choice in choices {
        current = arbitrary.shrink(&current).into_iter().nth(choice)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::{integer_in, one_of_values};
    use crate::property::Property;

    fn fails_on_even() -> Property {
        Property::new(
            one_of_values(vec![1.into(), 2.into(), 3.into(), 4.into(), 5.into()]).unwrap(),
            |v| {
                if let Value::Int(n) = v {
                    assert!(n % 2 != 0, "even value {n}");
                }
            },
        )
    }

    #[test]
    fn shrinks_four_to_two_in_one_round() {
        // Candidates of 4 under one_of(1..=5) are [1, 2, 3]; 1 passes, 2
        // still fails, so round one accepts candidate index 1 and the next
        // round finds no failing candidate.
        let property = fails_on_even();
        let outcome = shrink(&property, Value::Int(4), "panic".into(), "even value 4".into());
        assert_eq!(outcome.value, Value::Int(2));
        assert_eq!(outcome.num_shrinks, 1);
        assert_eq!(outcome.choices, vec![1]);
        assert_eq!(outcome.failures, vec![Value::Int(4), Value::Int(2)]);
    }

    #[test]
    fn final_counterexample_is_minimal() {
        let property = fails_on_even();
        let outcome = shrink(&property, Value::Int(4), "panic".into(), "even".into());
        assert!(property.evaluate(&outcome.value).is_some());
        for candidate in property.arbitrary().shrink(&outcome.value) {
            assert!(
                property.evaluate(&candidate).is_none(),
                "direct candidate {candidate} still fails; shrinking should have continued"
            );
        }
    }

    #[test]
    fn replay_reproduces_the_final_value() {
        let property = fails_on_even();
        let outcome = shrink(&property, Value::Int(4), "panic".into(), "even".into());
        let replayed = replay(property.arbitrary(), &Value::Int(4), &outcome.choices);
        assert_eq!(replayed, Some(outcome.value));
    }

    #[test]
    fn bisection_converges_on_the_boundary() {
        let property = Property::new(integer_in(0, 1000).unwrap(), |v| {
            if let Value::Int(n) = v {
                assert!(*n < 10, "too big: {n}");
            }
        });
        let outcome = shrink(&property, Value::Int(700), "panic".into(), "too big".into());
        assert_eq!(outcome.value, Value::Int(10));
        assert!(property.evaluate(&Value::Int(9)).is_none());
    }

    #[test]
    fn all_failing_one_of_lands_on_first_alternative() {
        let property = Property::new(
            one_of_values(vec![1.into(), 2.into()]).unwrap(),
            |_| panic!("always"),
        );
        let outcome = shrink(&property, Value::Int(2), "panic".into(), "always".into());
        assert!(property.evaluate(&outcome.value).is_some());
        assert_eq!(outcome.value, Value::Int(1));
        assert_eq!(outcome.num_shrinks, 1);
    }

    #[test]
    fn already_minimal_value_shrinks_zero_times() {
        let property = fails_on_even();
        let outcome = shrink(&property, Value::Int(2), "panic".into(), "even".into());
        assert_eq!(outcome.num_shrinks, 0);
        assert_eq!(outcome.choices, Vec::<usize>::new());
        assert_eq!(outcome.failures, vec![Value::Int(2)]);
    }
}
