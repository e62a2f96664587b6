//! Compositions and their exhaustive enumeration.
//!
//! A composition is an ordered split of `troops` identical units across
//! `fields` battlefields. Enumeration is recursive backtracking and yields
//! compositions in lexicographic order.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// An ordered allocation of troop counts, one entry per field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Composition(Vec<u32>);

impl Composition {
    /// Wraps a vector of per-field troop counts.
    pub fn new(counts: Vec<u32>) -> Self {
        Composition(counts)
    }

    /// Per-field troop counts.
    pub fn counts(&self) -> &[u32] {
        &self.0
    }

    /// Number of fields covered by this allocation.
    pub fn fields(&self) -> usize {
        self.0.len()
    }

    /// Total troops placed across all fields.
    pub fn troops(&self) -> u64 {
        self.0.iter().map(|&c| c as u64).sum()
    }

    /// Returns the counts sorted ascending. Two compositions share a
    /// permutation class exactly when their sorted forms are equal.
    pub fn sorted(&self) -> Composition {
        let mut counts = self.0.clone();
        counts.sort_unstable();
        Composition(counts)
    }

    pub fn into_inner(self) -> Vec<u32> {
        self.0
    }
}

impl Deref for Composition {
    type Target = [u32];

    fn deref(&self) -> &[u32] {
        &self.0
    }
}

impl From<Vec<u32>> for Composition {
    fn from(counts: Vec<u32>) -> Self {
        Composition(counts)
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, "]")
    }
}

/// Enumerates every composition of `troops` over `fields` in lexicographic
/// order. Returns an empty set when `fields == 0`.
pub fn compositions(troops: u32, fields: usize) -> Vec<Composition> {
    if fields == 0 {
        return Vec::new();
    }
    let capacity = composition_count(troops, fields)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    let mut out = Vec::with_capacity(capacity);
    let mut current = vec![0u32; fields];
    distribute(0, troops, &mut current, &mut out);
    out
}

/// Assigns every count from 0 to `remaining` at `index`, recursing on the
/// rest. The last field absorbs whatever is left.
fn distribute(index: usize, remaining: u32, current: &mut [u32], out: &mut Vec<Composition>) {
    if index == current.len() - 1 {
        current[index] = remaining;
        out.push(Composition(current.to_vec()));
        return;
    }
    for n in 0..=remaining {
        current[index] = n;
        distribute(index + 1, remaining - n, current, out);
    }
    current[index] = 0;
}

/// Number of compositions of `troops` over `fields`: C(troops+fields-1, fields-1).
///
/// Returns `None` if the count does not fit in a `u128`.
pub fn composition_count(troops: u32, fields: usize) -> Option<u128> {
    if fields == 0 {
        return Some(0);
    }
    let n = troops as u128 + fields as u128 - 1;
    binomial(n, fields as u128 - 1)
}

/// Exact binomial coefficient with overflow detection.
pub(crate) fn binomial(n: u128, k: u128) -> Option<u128> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 1..=k {
        // result * (n - k + i) is always divisible by i here.
        result = result.checked_mul(n - k + i)? / i;
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comps(troops: u32, fields: usize) -> Vec<Vec<u32>> {
        compositions(troops, fields)
            .into_iter()
            .map(Composition::into_inner)
            .collect()
    }

    #[test]
    fn single_field_holds_everything() {
        assert_eq!(comps(3, 1), vec![vec![3]]);
    }

    #[test]
    fn zero_troops_yields_all_zero() {
        assert_eq!(comps(0, 4), vec![vec![0, 0, 0, 0]]);
    }

    #[test]
    fn zero_fields_yields_nothing() {
        assert!(compositions(5, 0).is_empty());
        assert_eq!(composition_count(5, 0), Some(0));
    }

    #[test]
    fn one_troop_two_fields_lexicographic() {
        assert_eq!(comps(1, 2), vec![vec![0, 1], vec![1, 0]]);
    }

    #[test]
    fn two_troops_three_fields_lexicographic() {
        assert_eq!(
            comps(2, 3),
            vec![
                vec![0, 0, 2],
                vec![0, 1, 1],
                vec![0, 2, 0],
                vec![1, 0, 1],
                vec![1, 1, 0],
                vec![2, 0, 0],
            ]
        );
    }

    #[test]
    fn every_composition_is_valid_and_unique() {
        for troops in 0..=7u32 {
            for fields in 1..=5usize {
                let all = compositions(troops, fields);
                for c in &all {
                    assert_eq!(c.fields(), fields);
                    assert_eq!(c.troops(), troops as u64);
                }
                let mut sorted = all.clone();
                sorted.sort();
                assert_eq!(sorted, all, "enumeration must be lexicographic");
                sorted.dedup();
                assert_eq!(sorted.len(), all.len(), "duplicates for {troops}/{fields}");
                assert_eq!(
                    composition_count(troops, fields),
                    Some(all.len() as u128),
                    "count mismatch for {troops}/{fields}"
                );
            }
        }
    }

    #[test]
    fn binomial_known_values() {
        assert_eq!(binomial(5, 2), Some(10));
        assert_eq!(binomial(7, 2), Some(21));
        assert_eq!(binomial(10, 0), Some(1));
        assert_eq!(binomial(3, 5), Some(0));
        assert_eq!(binomial(52, 5), Some(2_598_960));
    }

    #[test]
    fn composition_count_overflow_is_none() {
        assert_eq!(composition_count(u32::MAX, 1_000), None);
    }

    #[test]
    fn display_lists_counts() {
        assert_eq!(Composition::new(vec![2, 2, 1]).to_string(), "[2, 2, 1]");
        assert_eq!(Composition::new(vec![]).to_string(), "[]");
    }

    #[test]
    fn sorted_is_class_key() {
        let a = Composition::new(vec![2, 0, 1]);
        let b = Composition::new(vec![1, 2, 0]);
        assert_eq!(a.sorted(), b.sorted());
        assert_eq!(a.sorted().counts(), &[0, 1, 2]);
    }
}
