use super::{Suggestion, SuggestionFamily};
use crate::types::History;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Magnitude {
    High,
    Low,
    Medium,
}

impl Magnitude {
    fn of(sum: u8) -> Self {
        match sum {
            10..=12 => Magnitude::High,
            2..=5 => Magnitude::Low,
            _ => Magnitude::Medium,
        }
    }

    fn is_extreme(&self) -> bool {
        *self != Magnitude::Medium
    }
}

/// Sum-magnitude heuristics over the winning-side sums. Rounds recorded
/// without sums silently disable any window they fall into.
pub fn analyze(history: &History) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    consecutive_highs(history, &mut suggestions);
    extreme_cluster(history, &mut suggestions);
    monotonic_run(history, &mut suggestions);
    suggestions
}

/// Winning-side sums for the trailing window, oldest first. None when the
/// history is shorter than the window or any round in it lacks sums.
fn winning_sums(history: &History, window: usize) -> Option<Vec<u8>> {
    if history.len() < window {
        return None;
    }
    history
        .last_n(window)
        .iter()
        .map(|round| round.winning_sum())
        .collect()
}

fn consecutive_highs(history: &History, out: &mut Vec<Suggestion>) {
    let sums = match winning_sums(history, 2) {
        Some(sums) => sums,
        None => return,
    };
    if sums.iter().all(|&s| Magnitude::of(s) == Magnitude::High) {
        out.push(Suggestion::new(
            SuggestionFamily::Sum,
            "Two high sums in a row; the next result leans low".to_string(),
        ));
    }
}

fn extreme_cluster(history: &History, out: &mut Vec<Suggestion>) {
    let sums = match winning_sums(history, 3) {
        Some(sums) => sums,
        None => return,
    };
    if sums.iter().all(|&s| Magnitude::of(s).is_extreme()) {
        out.push(Suggestion::new(
            SuggestionFamily::Sum,
            "The last three sums were all extreme; expect a medium sum next".to_string(),
        ));
    }
}

fn monotonic_run(history: &History, out: &mut Vec<Suggestion>) {
    let sums = match winning_sums(history, 3) {
        Some(sums) => sums,
        None => return,
    };
    let rising = sums[0] < sums[1] && sums[1] < sums[2];
    let falling = sums[0] > sums[1] && sums[1] > sums[2];
    if rising || falling {
        out.push(Suggestion::new(
            SuggestionFamily::Sum,
            "Three strictly rising or falling sums; expect an abrupt break".to_string(),
        ));
    }
}
