//! Robust strategy selection.
//!
//! For every candidate base composition, computes its outcome statistics
//! against every opponent base composition over the cross product of their
//! distinct orderings, then picks the candidate whose worst-case margin
//! (`win - lose`) is largest. Ties keep the candidate that comes first in
//! enumeration order.
//!
//! Statistics only depend on the multisets of the two compositions, so they
//! are computed once per pair of permutation classes and mirrored through
//! antisymmetry. The per-candidate reduction still walks every opponent in
//! enumeration order, so results match a direct nested loop exactly.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::stats::PairStatistics;
use crate::game::{composition_count, compositions, distinct_permutations, Composition};

/// Default cap on the composition set size accepted by bounded callers.
pub const DEFAULT_MAX_COMPOSITIONS: u128 = 5000;

/// Upper bound on worker threads for one solve.
pub const MAX_THREADS: usize = 256;

/// Errors raised by solver construction and solving.
#[derive(Debug, Error, PartialEq)]
pub enum SolverError {
    #[error("invalid {name} '{value}': must be a positive integer")]
    InvalidParameter { name: &'static str, value: i64 },

    #[error("{troops} troops over {fields} fields gives {compositions} compositions, limit is {limit}")]
    TooLarge {
        troops: u32,
        fields: usize,
        compositions: u128,
        limit: u128,
    },

    #[error("no robust allocation: best is {composition} with worst-case margin {worst_case_margin:.4}")]
    NoRobustAllocation {
        composition: Composition,
        worst_case_margin: f64,
    },

    #[error("unknown acceptance policy '{0}'")]
    UnknownPolicy(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// What to do when no candidate reaches a non-negative worst-case margin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcceptancePolicy {
    /// Always return the least-bad candidate.
    #[default]
    BestEffort,
    /// Reject with `SolverError::NoRobustAllocation`.
    Strict,
}

impl FromStr for AcceptancePolicy {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "besteffort" | "best-effort" | "best_effort" => Ok(AcceptancePolicy::BestEffort),
            "strict" => Ok(AcceptancePolicy::Strict),
            _ => Err(SolverError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for AcceptancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcceptancePolicy::BestEffort => write!(f, "besteffort"),
            AcceptancePolicy::Strict => write!(f, "strict"),
        }
    }
}

/// Per-call solve settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveConfig {
    pub policy: AcceptancePolicy,
    /// Worker threads. 0 or 1 solves on the calling thread; values above
    /// `MAX_THREADS` are clamped.
    pub threads: usize,
}

impl Default for SolveConfig {
    fn default() -> Self {
        SolveConfig {
            policy: AcceptancePolicy::default(),
            threads: std::thread::available_parallelism()
                .map(|n| n.get().min(MAX_THREADS))
                .unwrap_or(1),
        }
    }
}

/// The selected allocation and how it fares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub composition: Composition,
    /// Mean win probability over all opponent base compositions.
    pub win_prob: f64,
    pub draw_prob: f64,
    pub lose_prob: f64,
    /// Minimum of `win - lose` over all opponent base compositions.
    pub worst_case_margin: f64,
}

impl Solution {
    /// True when win probability is at least loss probability against every
    /// opponent.
    pub fn is_robust(&self) -> bool {
        self.worst_case_margin >= 0.0
    }
}

/// Aggregate of one candidate against every opponent.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CandidateReport {
    worst_case_margin: f64,
    win_prob: f64,
    draw_prob: f64,
    lose_prob: f64,
}

/// Runs indexed jobs either inline or on a dedicated rayon pool. Output order
/// always follows the index, never completion order.
enum Workers {
    Inline,
    Pool(rayon::ThreadPool),
}

impl Workers {
    fn new(threads: usize) -> Result<Self, SolverError> {
        if threads <= 1 {
            return Ok(Workers::Inline);
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads.min(MAX_THREADS))
            .build()
            .map(Workers::Pool)
            .map_err(|e| SolverError::ThreadPool(e.to_string()))
    }

    fn map<T, F>(&self, n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        match self {
            Workers::Inline => (0..n).map(f).collect(),
            Workers::Pool(pool) => pool.install(|| (0..n).into_par_iter().map(&f).collect()),
        }
    }
}

/// A ready-to-query solver for one (troops, fields) game.
///
/// The composition set and permutation classes are built at construction and
/// never change afterwards; every solve is a pure query over them.
#[derive(Debug, Clone)]
pub struct Solver {
    troops: u32,
    fields: usize,
    compositions: Vec<Composition>,
    /// Permutation class of each composition, indexed like `compositions`.
    class_of: Vec<usize>,
    /// Distinct orderings of each class, classes numbered by first appearance.
    classes: Vec<Vec<Composition>>,
}

impl Solver {
    /// Validates parameters and enumerates the composition set.
    pub fn new(troops: i64, fields: i64) -> Result<Solver, SolverError> {
        let (troops, fields) = validate(troops, fields)?;
        Ok(Solver::build(troops, fields))
    }

    /// Like [`Solver::new`], but refuses games whose composition set would
    /// exceed `limit` entries. The check runs before enumeration.
    pub fn bounded(troops: i64, fields: i64, limit: u128) -> Result<Solver, SolverError> {
        let (troops, fields) = validate(troops, fields)?;
        let count = composition_count(troops, fields).unwrap_or(u128::MAX);
        if count > limit {
            return Err(SolverError::TooLarge {
                troops,
                fields,
                compositions: count,
                limit,
            });
        }
        Ok(Solver::build(troops, fields))
    }

    fn build(troops: u32, fields: usize) -> Solver {
        let start = Instant::now();
        let compositions = compositions(troops, fields);

        let mut index: HashMap<Composition, usize> = HashMap::new();
        let mut classes: Vec<Vec<Composition>> = Vec::new();
        let mut class_of = Vec::with_capacity(compositions.len());
        for c in &compositions {
            let next = classes.len();
            let class = *index.entry(c.sorted()).or_insert_with(|| {
                classes.push(distinct_permutations(c));
                next
            });
            class_of.push(class);
        }

        log::debug!(
            "enumerated {} compositions in {} permutation classes for {} troops over {} fields ({}ms)",
            compositions.len(),
            classes.len(),
            troops,
            fields,
            start.elapsed().as_millis()
        );

        Solver {
            troops,
            fields,
            compositions,
            class_of,
            classes,
        }
    }

    pub fn troops(&self) -> u32 {
        self.troops
    }

    pub fn fields(&self) -> usize {
        self.fields
    }

    /// The full composition set in enumeration order.
    pub fn compositions(&self) -> &[Composition] {
        &self.compositions
    }

    /// Number of distinct permutation classes (troop multisets).
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of single allocation comparisons one solve performs.
    pub fn comparisons(&self) -> u128 {
        let sizes: Vec<u128> = self.classes.iter().map(|c| c.len() as u128).collect();
        let mut total: u128 = 0;
        for (i, &a) in sizes.iter().enumerate() {
            for &b in &sizes[i..] {
                total = total.saturating_add(a.saturating_mul(b));
            }
        }
        total
    }

    /// Statistics for composition `player` against composition `opponent`,
    /// both given as indices into [`Solver::compositions`].
    pub fn pair_statistics(&self, player: usize, opponent: usize) -> PairStatistics {
        PairStatistics::tally(
            &self.classes[self.class_of[player]],
            &self.classes[self.class_of[opponent]],
        )
    }

    /// Best-effort solve on the calling thread.
    pub fn solve(&self) -> Solution {
        self.select(&Workers::Inline)
    }

    /// Solves with an explicit acceptance policy and worker count.
    pub fn solve_with(&self, config: &SolveConfig) -> Result<Solution, SolverError> {
        let workers = Workers::new(config.threads)?;
        let solution = self.select(&workers);
        if config.policy == AcceptancePolicy::Strict && !solution.is_robust() {
            return Err(SolverError::NoRobustAllocation {
                composition: solution.composition,
                worst_case_margin: solution.worst_case_margin,
            });
        }
        Ok(solution)
    }

    fn select(&self, workers: &Workers) -> Solution {
        let start = Instant::now();
        let matrix = self.class_matrix(workers);
        let reports = workers.map(self.classes.len(), |class| {
            candidate_report(&matrix[class], &self.class_of)
        });

        let mut best: Option<(usize, CandidateReport)> = None;
        for (idx, &class) in self.class_of.iter().enumerate() {
            let report = reports[class];
            let improves = match best {
                Some((_, incumbent)) => report.worst_case_margin > incumbent.worst_case_margin,
                None => true,
            };
            if improves {
                best = Some((idx, report));
            }
        }

        // The composition set is never empty: troops and fields are validated.
        let (idx, report) = best.unwrap_or((
            0,
            CandidateReport {
                worst_case_margin: 0.0,
                win_prob: 0.0,
                draw_prob: 0.0,
                lose_prob: 0.0,
            },
        ));

        let solution = Solution {
            composition: self.compositions[idx].clone(),
            win_prob: report.win_prob,
            draw_prob: report.draw_prob,
            lose_prob: report.lose_prob,
            worst_case_margin: report.worst_case_margin,
        };
        log::info!(
            "selected {} with worst-case margin {:.4} ({}ms)",
            solution.composition,
            solution.worst_case_margin,
            start.elapsed().as_millis()
        );
        solution
    }

    /// Class-by-class statistics. Only the upper triangle is tallied; the
    /// lower one is its reversal.
    fn class_matrix(&self, workers: &Workers) -> Vec<Vec<PairStatistics>> {
        let k = self.classes.len();
        let upper = workers.map(k, |i| {
            (i..k)
                .map(|j| PairStatistics::tally(&self.classes[i], &self.classes[j]))
                .collect::<Vec<_>>()
        });

        let mut matrix = vec![vec![PairStatistics::default(); k]; k];
        for (i, row) in upper.into_iter().enumerate() {
            for (offset, stats) in row.into_iter().enumerate() {
                let j = i + offset;
                matrix[i][j] = stats;
                matrix[j][i] = stats.reversed();
            }
        }
        matrix
    }
}

/// Folds one candidate's row over every opponent in enumeration order.
fn candidate_report(row: &[PairStatistics], opponents: &[usize]) -> CandidateReport {
    if opponents.is_empty() {
        return CandidateReport {
            worst_case_margin: 0.0,
            win_prob: 0.0,
            draw_prob: 0.0,
            lose_prob: 0.0,
        };
    }

    let mut worst = f64::INFINITY;
    let mut win_sum = 0.0;
    let mut draw_sum = 0.0;
    let mut lose_sum = 0.0;
    for &class in opponents {
        let stats = &row[class];
        worst = worst.min(stats.margin());
        win_sum += stats.win_prob();
        draw_sum += stats.draw_prob();
        lose_sum += stats.lose_prob();
    }

    let n = opponents.len() as f64;
    CandidateReport {
        worst_case_margin: worst,
        win_prob: win_sum / n,
        draw_prob: draw_sum / n,
        lose_prob: lose_sum / n,
    }
}

fn validate(troops: i64, fields: i64) -> Result<(u32, usize), SolverError> {
    let troops = u32::try_from(troops)
        .ok()
        .filter(|&t| t > 0)
        .ok_or(SolverError::InvalidParameter {
            name: "troops",
            value: troops,
        })?;
    let fields = usize::try_from(fields)
        .ok()
        .filter(|&f| f > 0)
        .ok_or(SolverError::InvalidParameter {
            name: "fields",
            value: fields,
        })?;
    Ok((troops, fields))
}
