//! Allocation primitives.
//!
//! Contains the composition type and its enumeration, distinct permutation
//! expansion, and the field-by-field outcome comparator.

pub mod composition;
pub mod outcome;
pub mod permutation;

pub use composition::{composition_count, compositions, Composition};
pub use outcome::{evaluate, field_points, Outcome};
pub use permutation::{distinct_permutation_count, distinct_permutations, next_permutation};
