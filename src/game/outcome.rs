//! Field-by-field outcome comparison.

/// Result of one allocation against another, from the player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// The same result seen from the opponent's side.
    pub fn reverse(self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Draw => Outcome::Draw,
            Outcome::Loss => Outcome::Win,
        }
    }
}

/// Counts fields won by each side. A field scores only for the side that
/// strictly exceeds the other; ties score nothing.
pub fn field_points(player: &[u32], opponent: &[u32]) -> (usize, usize) {
    debug_assert_eq!(player.len(), opponent.len());
    let mut ours = 0;
    let mut theirs = 0;
    for (&p, &o) in player.iter().zip(opponent) {
        if p > o {
            ours += 1;
        } else if o > p {
            theirs += 1;
        }
    }
    (ours, theirs)
}

/// Decides the outcome for `player`: more fields won is a win, equal field
/// counts draw.
pub fn evaluate(player: &[u32], opponent: &[u32]) -> Outcome {
    let (ours, theirs) = field_points(player, opponent);
    match ours.cmp(&theirs) {
        std::cmp::Ordering::Greater => Outcome::Win,
        std::cmp::Ordering::Equal => Outcome::Draw,
        std::cmp::Ordering::Less => Outcome::Loss,
    }
}
