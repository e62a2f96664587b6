//! Blotto engine library.
//!
//! Exposes composition enumeration, outcome evaluation, the robust strategy
//! solver, and the line protocol for use by integration tests and the binary
//! entry points.

pub mod engine;
pub mod game;
pub mod logging;
pub mod protocol;
pub mod solve;
