//! # propcheck
//!
//! A property-based testing engine: declare what values to generate and what
//! must hold for every generated value; the engine samples values from a
//! seeded stream, executes the predicate, and on failure deterministically
//! reduces the failing input to a minimal counterexample.
//!
//! Two subsystems carry the weight: the arbitrary algebra (generator +
//! shrinker pairs that compose and replay from a seed) and the trial runner,
//! which produces seed-deterministic, index-ordered results across four
//! interchangeable execution backends — sequential, shared-memory threads,
//! forked processes, and message-only isolated actors. Backend choice is a
//! performance and isolation trade-off, never a correctness variable.
//!
//! ```
//! use propcheck::{array, integer, forall, Value};
//!
//! let report = forall(array(integer()), |v| {
//!     if let Value::Array(items) = v {
//!         let mut sorted = items.clone();
//!         sorted.reverse();
//!         sorted.reverse();
//!         assert_eq!(&sorted, items);
//!     }
//! })
//! .unwrap();
//! report.assert_passed();
//! ```

pub mod arbitrary;
pub mod backend;
pub mod config;
pub mod error;
pub mod property;
pub mod random;
pub mod report;
pub mod runner;
pub mod shrinker;
pub mod value;

pub use arbitrary::{
    array, array_with, boolean, char_any, constant, integer, integer_in, integer_toward, map_of,
    map_with, one_of, one_of_values, record, string, string_with, symbol, tuple, Arbitrary,
};
pub use config::{
    default_configuration, set_default_configuration, ConcurrencyMethod, RunConfiguration,
};
pub use error::Error;
pub use property::{fail, PredicateFailure, Property, TrialOutcome};
pub use report::RunReport;
pub use runner::{forall, Runner};
pub use shrinker::{replay, ShrinkPath};
pub use value::Value;
