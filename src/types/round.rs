use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Outcome;

/// Valid range for a single side's dice sum (two dice).
pub const MIN_DICE_SUM: u8 = 2;
pub const MAX_DICE_SUM: u8 = 12;

/// One recorded round. Immutable once appended; `sums` holds the
/// (player, banker) dice totals when the caller supplied them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub timestamp: DateTime<Utc>,
    pub outcome: Outcome,
    pub sums: Option<(u8, u8)>,
}

impl Round {
    pub fn new(timestamp: DateTime<Utc>, outcome: Outcome, sums: Option<(u8, u8)>) -> Self {
        Self {
            timestamp,
            outcome,
            sums,
        }
    }

    /// The sum the magnitude heuristics look at: the winning side's total,
    /// or the shared total on a tie.
    pub fn winning_sum(&self) -> Option<u8> {
        self.sums.map(|(player, banker)| match self.outcome {
            Outcome::Player => player,
            Outcome::Banker => banker,
            Outcome::Tie => player,
        })
    }
}

/// Insertion-ordered round history. Append-only apart from the tail
/// removal done by undo and the full reset done by clear.
#[derive(Debug, Clone, Default)]
pub struct History {
    rounds: Vec<Round>,
}

impl History {
    pub fn new() -> Self {
        Self { rounds: Vec::new() }
    }

    pub fn from_rounds(rounds: Vec<Round>) -> Self {
        Self { rounds }
    }

    pub fn push(&mut self, round: Round) {
        self.rounds.push(round);
    }

    pub fn pop(&mut self) -> Option<Round> {
        self.rounds.pop()
    }

    pub fn clear(&mut self) {
        self.rounds.clear();
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn last(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn last_n(&self, n: usize) -> &[Round] {
        let len = self.rounds.len();
        if n >= len {
            &self.rounds[..]
        } else {
            &self.rounds[len - n..]
        }
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.rounds.iter().map(|r| r.outcome).collect()
    }

    pub fn into_rounds(self) -> Vec<Round> {
        self.rounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(outcome: Outcome) -> Round {
        Round::new(Utc::now(), outcome, None)
    }

    #[test]
    fn test_history_last_n_clamps() {
        let mut history = History::new();
        history.push(round(Outcome::Player));
        history.push(round(Outcome::Banker));

        assert_eq!(history.last_n(1).len(), 1);
        assert_eq!(history.last_n(5).len(), 2);
        assert_eq!(history.last_n(1)[0].outcome, Outcome::Banker);
    }

    #[test]
    fn test_winning_sum_follows_outcome() {
        let mut r = Round::new(Utc::now(), Outcome::Player, Some((10, 6)));
        assert_eq!(r.winning_sum(), Some(10));

        r.outcome = Outcome::Banker;
        assert_eq!(r.winning_sum(), Some(6));

        r.outcome = Outcome::Tie;
        r.sums = Some((8, 8));
        assert_eq!(r.winning_sum(), Some(8));

        r.sums = None;
        assert_eq!(r.winning_sum(), None);
    }
}
