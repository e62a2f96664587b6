//! Distinct permutations of a composition.
//!
//! Treats the composition as a multiset and walks its orderings with the
//! next-lexicographic-permutation step, starting from the ascending sort.
//! Equal values are never swapped past each other, so duplicate orderings are
//! never produced. Worst case is O(fields!) outputs when all counts differ.

use super::composition::{binomial, Composition};

/// Rearranges `values` into the next lexicographically greater ordering.
///
/// Returns `false` and leaves `values` untouched once the last (descending)
/// ordering has been reached.
pub fn next_permutation(values: &mut [u32]) -> bool {
    let n = values.len();
    if n < 2 {
        return false;
    }

    // Longest non-increasing suffix starts at `i`.
    let mut i = n - 1;
    while i > 0 && values[i - 1] >= values[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }

    // Rightmost element strictly greater than the pivot.
    let mut j = n - 1;
    while values[j] <= values[i - 1] {
        j -= 1;
    }
    values.swap(i - 1, j);
    values[i..].reverse();
    true
}

/// Returns every distinct ordering of `composition`, in lexicographic order.
pub fn distinct_permutations(composition: &Composition) -> Vec<Composition> {
    let mut current = composition.sorted().into_inner();
    let capacity = distinct_permutation_count(composition)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    let mut out = Vec::with_capacity(capacity);
    out.push(Composition::new(current.clone()));
    while next_permutation(&mut current) {
        out.push(Composition::new(current.clone()));
    }
    out
}

/// Size of the permutation set: `fields! / Π(multiplicity!)`, computed as a
/// product of binomials so intermediate values stay small.
///
/// Returns `None` on `u128` overflow.
pub fn distinct_permutation_count(composition: &Composition) -> Option<u128> {
    let sorted = composition.sorted();
    let mut result: u128 = 1;
    let mut placed: u128 = 0;
    for run in sorted.chunk_by(|a, b| a == b) {
        let m = run.len() as u128;
        placed += m;
        result = result.checked_mul(binomial(placed, m)?)?;
    }
    Some(result)
}
