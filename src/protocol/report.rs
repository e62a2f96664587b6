//! Solution rendering.
//!
//! `format_solution` produces the single-line JSON carried by the `solution`
//! response; `write_report` prints the human-readable summary used by the
//! one-shot CLI.

use std::io::{self, Write};

use crate::solve::Solution;

/// Verdict when the worst-case margin is non-negative.
pub const ROBUST_VERDICT: &str =
    "guaranteed win-or-draw dominance against every opponent strategy";

/// Verdict when some opponent beats the selection more often than not.
pub const PARTIAL_VERDICT: &str = "best available, not fully robust";

/// Qualitative reading of a solution's worst-case margin.
pub fn verdict(solution: &Solution) -> &'static str {
    if solution.is_robust() {
        ROBUST_VERDICT
    } else {
        PARTIAL_VERDICT
    }
}

/// Serializes a solution as compact JSON.
pub fn format_solution(solution: &Solution) -> serde_json::Result<String> {
    serde_json::to_string(solution)
}

/// Writes the multi-line summary with probabilities to 4 decimal places.
pub fn write_report<W: Write>(solution: &Solution, out: &mut W) -> io::Result<()> {
    writeln!(out, "Solution: {}", solution.composition)?;
    writeln!(out, "Against all opponent strategies and permutations:")?;
    writeln!(out, "  Probability of Winning: {:.4}", solution.win_prob)?;
    writeln!(out, "  Probability of Drawing: {:.4}", solution.draw_prob)?;
    writeln!(out, "  Probability of Losing:  {:.4}", solution.lose_prob)?;
    writeln!(out, "  Worst-case margin:      {:.4}", solution.worst_case_margin)?;
    writeln!(out, "{}", verdict(solution))?;
    out.flush()
}
