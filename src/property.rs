//! Properties: an arbitrary bound to a predicate.
//!
//! A predicate signals failure exclusively by panicking; any normal return is
//! a pass. The panic is caught at the trial boundary and converted into data,
//! so a failing trial never unwinds through a backend or the runner.

use std::cmp;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::arbitrary::Arbitrary;
use crate::random;
use crate::value::Value;

/// Largest size hint handed to size-driven arbitraries.
const MAX_SIZE_HINT: usize = 50;

/// A typed failure payload for predicates that want a named error kind.
/// Plain `panic!` / failed `assert!` payloads are reported with kind
/// `"panic"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateFailure {
    pub kind: String,
    pub message: String,
}

/// Fail the current trial with an explicit kind and message.
pub fn fail(kind: &str, message: &str) -> ! {
    std::panic::panic_any(PredicateFailure {
        kind: kind.to_string(),
        message: message.to_string(),
    })
}

/// The per-trial result a backend hands back to the runner. Serializable so
/// the process backend can move it across its channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrialOutcome {
    /// The value is retained only under verbose runs.
    Pass { value: Option<Value> },
    Fail {
        value: Value,
        kind: String,
        message: String,
    },
}

impl TrialOutcome {
    pub fn is_fail(&self) -> bool {
        matches!(self, TrialOutcome::Fail { .. })
    }

    /// The recorded value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            TrialOutcome::Pass { value } => value.as_ref(),
            TrialOutcome::Fail { value, .. } => Some(value),
        }
    }
}

#[derive(Clone)]
enum Predicate {
    /// An arbitrary closure; may capture caller state. Usable by the
    /// sequential, threaded, and process backends.
    Shared(Arc<dyn Fn(&Value) + Send + Sync>),
    /// A capture-free function pointer: the construction-time encoding of
    /// the actor backend's transferable-only constraint.
    Isolated(fn(&Value)),
}

/// One arbitrary bound to one predicate. Multi-argument predicates are
/// expressed with a tuple arbitrary.
#[derive(Clone)]
pub struct Property {
    arbitrary: Arbitrary,
    predicate: Predicate,
}

impl Property {
    /// Bind an arbitrary to a shared-closure predicate.
    pub fn new<F>(arbitrary: Arbitrary, predicate: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        Property {
            arbitrary,
            predicate: Predicate::Shared(Arc::new(predicate)),
        }
    }

    /// Bind an arbitrary to a capture-free predicate, making the property
    /// eligible for the actor backend.
    pub fn isolated(arbitrary: Arbitrary, predicate: fn(&Value)) -> Self {
        Property {
            arbitrary,
            predicate: Predicate::Isolated(predicate),
        }
    }

    pub fn arbitrary(&self) -> &Arbitrary {
        &self.arbitrary
    }

    /// The underlying function pointer, when the property was built with
    /// `isolated`. The actor backend refuses properties where this is `None`.
    pub fn isolated_fn(&self) -> Option<fn(&Value)> {
        match self.predicate {
            Predicate::Isolated(f) => Some(f),
            Predicate::Shared(_) => None,
        }
    }

    /// Re-derive the exact value generated at (seed, index). Generation is a
    /// pure function of the sub-stream, so this reproduces what any backend
    /// saw at that index.
    pub fn generate_at(&self, seed: u64, index: u32) -> Value {
        let mut rng = random::substream(seed, index);
        self.arbitrary.generate(&mut rng, size_hint(index))
    }

    /// Invoke the predicate on `value`. `None` means pass; a caught panic is
    /// converted into a failure payload.
    pub fn evaluate(&self, value: &Value) -> Option<PredicateFailure> {
        let outcome = catch_unwind(AssertUnwindSafe(|| match &self.predicate {
            Predicate::Shared(f) => f(value),
            Predicate::Isolated(f) => f(value),
        }));
        match outcome {
            Ok(()) => None,
            Err(payload) => Some(failure_from_payload(payload.as_ref())),
        }
    }

    /// One full trial: derive the sub-stream, generate, evaluate.
    pub fn run_trial(&self, seed: u64, index: u32, verbose: bool) -> TrialOutcome {
        let value = self.generate_at(seed, index);
        match self.evaluate(&value) {
            None => TrialOutcome::Pass {
                value: verbose.then_some(value),
            },
            Some(failure) => TrialOutcome::Fail {
                value,
                kind: failure.kind,
                message: failure.message,
            },
        }
    }
}

impl std::fmt::Debug for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("arbitrary", &self.arbitrary)
            .field(
                "predicate",
                match &self.predicate {
                    Predicate::Shared(_) => &"shared",
                    Predicate::Isolated(_) => &"isolated",
                },
            )
            .finish()
    }
}

/// Early trials get small size hints so simple counterexamples surface
/// before large ones; the hint grows with the index up to a cap.
fn size_hint(index: u32) -> usize {
    cmp::min(1 + index as usize, MAX_SIZE_HINT)
}

fn failure_from_payload(payload: &(dyn std::any::Any + Send)) -> PredicateFailure {
    if let Some(failure) = payload.downcast_ref::<PredicateFailure>() {
        return failure.clone();
    }
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "predicate panicked".to_string()
    };
    PredicateFailure {
        kind: "panic".to_string(),
        message,
    }
}
