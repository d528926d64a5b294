//! Error taxonomy for the engine.
//!
//! Predicate failures are deliberately *not* part of this enum: a failing
//! predicate is the expected, recoverable outcome the engine exists to find,
//! and it travels as data (`TrialOutcome::Fail`). The variants here are the
//! fatal conditions that terminate a call instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Contradictory or out-of-range options, detected eagerly at arbitrary,
    /// property, or runner construction time.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A predicate attempted to cross an isolation boundary illegally, or an
    /// isolated worker died before reporting its batch.
    #[error("isolation violation: {0}")]
    Isolation(String),

    /// The selected execution backend does not exist on this target.
    #[error("unsupported backend: {0}")]
    Unsupported(String),

    /// An internal engine invariant was violated.
    #[error("engine invariant violated: {0}")]
    Invariant(String),
}
