//! Win/draw/loss tallies over permutation cross-products.

use crate::game::{distinct_permutations, evaluate, Composition, Outcome};

/// Outcome counts for one player base composition against one opponent base
/// composition, over every pair of their distinct orderings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairStatistics {
    pub wins: u64,
    pub draws: u64,
    pub losses: u64,
}

impl PairStatistics {
    /// Expands both bases and tallies the full cross product.
    pub fn between(player: &Composition, opponent: &Composition) -> PairStatistics {
        PairStatistics::tally(
            &distinct_permutations(player),
            &distinct_permutations(opponent),
        )
    }

    /// Tallies outcomes for every (player, opponent) pair of orderings.
    pub fn tally(player: &[Composition], opponent: &[Composition]) -> PairStatistics {
        let mut stats = PairStatistics::default();
        for p in player {
            for o in opponent {
                stats.record(evaluate(p, o));
            }
        }
        stats
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.wins + self.draws + self.losses
    }

    /// The same tally from the opponent's side.
    pub fn reversed(&self) -> PairStatistics {
        PairStatistics {
            wins: self.losses,
            draws: self.draws,
            losses: self.wins,
        }
    }

    pub fn win_prob(&self) -> f64 {
        self.ratio(self.wins)
    }

    pub fn draw_prob(&self) -> f64 {
        self.ratio(self.draws)
    }

    pub fn lose_prob(&self) -> f64 {
        self.ratio(self.losses)
    }

    /// `win_prob - lose_prob`.
    pub fn margin(&self) -> f64 {
        self.win_prob() - self.lose_prob()
    }

    fn ratio(&self, count: u64) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        }
    }
}
