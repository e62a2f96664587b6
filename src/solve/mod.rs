//! Robust strategy solving.
//!
//! Tallies outcome statistics between base compositions over their
//! permutation sets and runs the minimax sweep that picks the allocation with
//! the best worst-case margin.

pub mod solver;
pub mod stats;

pub use solver::{
    AcceptancePolicy, SolveConfig, Solution, Solver, SolverError, DEFAULT_MAX_COMPOSITIONS,
    MAX_THREADS,
};
pub use stats::PairStatistics;
