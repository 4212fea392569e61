use super::{Suggestion, SuggestionFamily};
use crate::types::{History, Outcome};

/// Combined color and sum heuristic: a hot Player streak backed by heavy
/// winning sums usually snaps toward Banker.
pub fn analyze(history: &History) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    hot_player_streak(history, &mut suggestions);
    suggestions
}

fn hot_player_streak(history: &History, out: &mut Vec<Suggestion>) {
    if history.len() < 4 {
        return;
    }
    let window = history.last_n(4);
    if !window.iter().all(|round| round.outcome == Outcome::Player) {
        return;
    }
    let sums: Option<Vec<u8>> = window.iter().map(|round| round.winning_sum()).collect();
    let sums = match sums {
        Some(sums) => sums,
        None => return,
    };
    if sums.iter().all(|&s| s > 8) {
        out.push(Suggestion::new(
            SuggestionFamily::Combo,
            "Four Player wins in a row with every winning sum above 8; weight the next bet about 80% Banker with a 20% Tie hedge".to_string(),
        ));
    }
}
