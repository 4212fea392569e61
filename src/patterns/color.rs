use super::table::trailing_run;
use super::{Suggestion, SuggestionFamily};
use crate::types::{History, Outcome};

/// Color-sequence heuristics: alternation, streak length and paired doubles
/// over the raw outcome tail.
pub fn analyze(history: &History) -> Vec<Suggestion> {
    let outcomes = history.outcomes();
    let mut suggestions = Vec::new();
    alternation(&outcomes, &mut suggestions);
    streak(&outcomes, &mut suggestions);
    double_pair(&outcomes, &mut suggestions);
    suggestions
}

fn alternation(outcomes: &[Outcome], out: &mut Vec<Suggestion>) {
    let n = outcomes.len();
    if n < 3 || outcomes[n - 1] == outcomes[n - 2] || outcomes[n - 2] == outcomes[n - 3] {
        return;
    }
    if n >= 4 && outcomes[n - 3] != outcomes[n - 4] {
        out.push(Suggestion::new(
            SuggestionFamily::Color,
            "Four rounds of alternation; a break is likely, do not chase the zig-zag".to_string(),
        ));
    } else {
        out.push(Suggestion::new(
            SuggestionFamily::Color,
            "Three rounds of alternation; ride the zig-zag up to a third leg, then step off".to_string(),
        ));
    }
}

fn streak(outcomes: &[Outcome], out: &mut Vec<Suggestion>) {
    let (outcome, length) = match trailing_run(outcomes) {
        Some(run) => run,
        None => return,
    };
    if (2..=4).contains(&length) {
        out.push(Suggestion::new(
            SuggestionFamily::Color,
            format!(
                "{} has landed {} in a row; a light bet on the trend continuing is reasonable",
                outcome, length
            ),
        ));
    } else if length >= 5 {
        out.push(Suggestion::new(
            SuggestionFamily::Color,
            format!(
                "{} is on a long streak of {}; consider fading the trend with caution",
                outcome, length
            ),
        ));
    }
}

fn double_pair(outcomes: &[Outcome], out: &mut Vec<Suggestion>) {
    let n = outcomes.len();
    if n < 4 {
        return;
    }
    if outcomes[n - 1] == outcomes[n - 2]
        && outcomes[n - 3] == outcomes[n - 4]
        && outcomes[n - 1] != outcomes[n - 3]
    {
        out.push(Suggestion::new(
            SuggestionFamily::Color,
            "Two consecutive pairs on the board; another pair is likely".to_string(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome::{Banker, Player, Tie};
    use crate::types::Round;
    use chrono::Utc;

    fn history_of(outcomes: &[Outcome]) -> History {
        let mut history = History::new();
        for &outcome in outcomes {
            history.push(Round::new(Utc::now(), outcome, None));
        }
        history
    }

    fn messages(history: &History) -> Vec<String> {
        analyze(history).into_iter().map(|s| s.message).collect()
    }

    #[test]
    fn test_three_round_alternation_advises_riding_it() {
        let msgs = messages(&history_of(&[Player, Player, Banker, Player]));
        assert!(msgs.iter().any(|m| m.contains("Three rounds of alternation")));
    }

    #[test]
    fn test_ties_count_toward_alternation() {
        let msgs = messages(&history_of(&[Tie, Player, Banker]));
        assert!(msgs.iter().any(|m| m.contains("Three rounds of alternation")));
    }

    #[test]
    fn test_four_round_alternation_warns_of_a_break() {
        let msgs = messages(&history_of(&[Player, Banker, Player, Banker]));
        assert!(msgs.iter().any(|m| m.contains("a break is likely")));
        assert!(!msgs.iter().any(|m| m.contains("Three rounds of alternation")));
    }

    #[test]
    fn test_short_streak_suggests_light_trend_bet() {
        let msgs = messages(&history_of(&[Banker, Player, Player]));
        assert!(msgs.iter().any(|m| m.contains("Player has landed 2 in a row")));
    }

    #[test]
    fn test_long_streak_suggests_fading() {
        let msgs = messages(&history_of(&[Banker; 5]));
        assert!(msgs.iter().any(|m| m.contains("long streak of 5")));
    }

    #[test]
    fn test_single_trailing_outcome_stays_quiet_on_streaks() {
        let msgs = messages(&history_of(&[Player, Player, Banker]));
        assert!(!msgs.iter().any(|m| m.contains("in a row")));
        assert!(!msgs.iter().any(|m| m.contains("long streak")));
    }

    #[test]
    fn test_double_pair_expects_another_pair() {
        let msgs = messages(&history_of(&[Player, Player, Banker, Banker]));
        assert!(msgs.iter().any(|m| m.contains("another pair is likely")));
    }

    #[test]
    fn test_mixed_tail_without_shapes_is_silent() {
        let msgs = messages(&history_of(&[Player, Player, Banker, Player, Player, Banker]));
        assert!(msgs.is_empty());
    }
}
