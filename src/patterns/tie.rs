use super::table::trailing_run;
use super::{Suggestion, SuggestionFamily};
use crate::types::{History, Outcome};

/// Tie-likelihood heuristics: recent ties, broken streaks and momentum
/// reversals all nudge the tie probability up.
pub fn analyze(history: &History) -> Vec<Suggestion> {
    let outcomes = history.outcomes();
    let mut suggestions = Vec::new();
    recent_tie(&outcomes, &mut suggestions);
    broken_streak(&outcomes, &mut suggestions);
    reversal(&outcomes, &mut suggestions);
    suggestions
}

fn recent_tie(outcomes: &[Outcome], out: &mut Vec<Suggestion>) {
    let tail = outcomes.len().saturating_sub(3);
    if outcomes[tail..].iter().any(|o| o.is_tie()) {
        out.push(Suggestion::new(
            SuggestionFamily::Tie,
            "A Tie landed within the last three rounds; a light follow-up Tie bet is worth considering".to_string(),
        ));
    }
}

fn broken_streak(outcomes: &[Outcome], out: &mut Vec<Suggestion>) {
    let n = outcomes.len();
    if n < 4 {
        return;
    }
    let (runner, length) = match trailing_run(&outcomes[..n - 1]) {
        Some(run) => run,
        None => return,
    };
    if runner != Outcome::Tie && length >= 3 && outcomes[n - 1] != runner {
        out.push(Suggestion::new(
            SuggestionFamily::Tie,
            format!(
                "A {}-round {} streak just broke; a light Tie bet is a reasonable option",
                length, runner
            ),
        ));
    }
}

fn reversal(outcomes: &[Outcome], out: &mut Vec<Suggestion>) {
    let n = outcomes.len();
    if n < 4 {
        return;
    }
    let flipped = matches!(
        (outcomes[n - 2], outcomes[n - 1]),
        (Outcome::Player, Outcome::Banker) | (Outcome::Banker, Outcome::Player)
    );
    if flipped {
        out.push(Suggestion::new(
            SuggestionFamily::Tie,
            "Momentum just reversed between Player and Banker; Tie has elevated probability over the next rounds".to_string(),
        ));
    }
}
