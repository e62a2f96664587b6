//! Engine protocol handling.
//!
//! This module implements the line-oriented command protocol used to drive
//! the engine from a host process, and the text and JSON renderings of a
//! solution.

pub mod parser;
pub mod report;

pub use parser::{parse_command, Command, ParseError, SolveParams};
pub use report::{format_solution, verdict, write_report, ROBUST_VERDICT, PARTIAL_VERDICT};
