use crate::types::Outcome;
use crate::types::Outcome::{Banker, Player, Tie};

/// One row of the prediction table: a shape over the trailing outcomes and
/// the outcome it expects next. Rows are evaluated top to bottom, so the
/// more specific shapes sit above the generic ones they would otherwise
/// lose to.
#[derive(Debug)]
pub struct PredictionRule {
    pub id: u32,
    pub name: &'static str,
    /// Smallest history length the rule is allowed to fire on.
    pub min_rounds: usize,
    pub predicts: Outcome,
    pub matcher: fn(&[Outcome]) -> bool,
}

impl PredictionRule {
    pub fn matches(&self, outcomes: &[Outcome]) -> bool {
        outcomes.len() >= self.min_rounds && (self.matcher)(outcomes)
    }
}

pub static PREDICTION_RULES: &[PredictionRule] = &[
    PredictionRule { id: 1, name: "tie-run-four", min_rounds: 4, predicts: Player, matcher: tie_run_four },
    PredictionRule { id: 2, name: "banker-island-tie", min_rounds: 7, predicts: Banker, matcher: banker_island_tie },
    PredictionRule { id: 3, name: "player-island-tie", min_rounds: 7, predicts: Player, matcher: player_island_tie },
    PredictionRule { id: 4, name: "banker-pair-bridge", min_rounds: 5, predicts: Banker, matcher: banker_pair_bridge },
    PredictionRule { id: 5, name: "player-pair-bridge", min_rounds: 5, predicts: Player, matcher: player_pair_bridge },
    PredictionRule { id: 6, name: "double-tie-then-player", min_rounds: 3, predicts: Player, matcher: double_tie_then_player },
    PredictionRule { id: 7, name: "double-tie-then-banker", min_rounds: 3, predicts: Banker, matcher: double_tie_then_banker },
    PredictionRule { id: 8, name: "player-run-four", min_rounds: 4, predicts: Player, matcher: player_run_four },
    PredictionRule { id: 9, name: "banker-run-four", min_rounds: 4, predicts: Banker, matcher: banker_run_four },
    PredictionRule { id: 10, name: "double-tie", min_rounds: 2, predicts: Tie, matcher: double_tie },
    PredictionRule { id: 11, name: "player-run-three", min_rounds: 3, predicts: Player, matcher: player_run_three },
    PredictionRule { id: 12, name: "banker-run-three", min_rounds: 3, predicts: Banker, matcher: banker_run_three },
    PredictionRule { id: 13, name: "tie-run-three", min_rounds: 3, predicts: Tie, matcher: tie_run_three },
    PredictionRule { id: 14, name: "player-tie-player", min_rounds: 3, predicts: Player, matcher: player_tie_player },
    PredictionRule { id: 15, name: "banker-tie-banker", min_rounds: 3, predicts: Banker, matcher: banker_tie_banker },
    PredictionRule { id: 16, name: "player-tie-banker", min_rounds: 3, predicts: Tie, matcher: player_tie_banker },
    PredictionRule { id: 17, name: "banker-tie-player", min_rounds: 3, predicts: Tie, matcher: banker_tie_player },
    PredictionRule { id: 18, name: "player-chain-tie", min_rounds: 4, predicts: Banker, matcher: player_chain_tie },
    PredictionRule { id: 19, name: "banker-chain-tie", min_rounds: 4, predicts: Player, matcher: banker_chain_tie },
    // needs a fourth round of context so a bare opening P,B,P stays silent
    PredictionRule { id: 20, name: "player-banker-player", min_rounds: 4, predicts: Banker, matcher: player_banker_player },
    PredictionRule { id: 21, name: "double-player", min_rounds: 2, predicts: Player, matcher: double_player },
    PredictionRule { id: 22, name: "double-banker", min_rounds: 2, predicts: Banker, matcher: double_banker },
    // shadowed by id 10 (same shape, higher priority)
    PredictionRule { id: 23, name: "double-tie-late", min_rounds: 2, predicts: Tie, matcher: double_tie },
    PredictionRule { id: 24, name: "alternation-to-player", min_rounds: 4, predicts: Player, matcher: alternation_to_player },
    // shadowed by id 20, which already claims any tail ending P,B,P
    PredictionRule { id: 25, name: "alternation-to-banker", min_rounds: 4, predicts: Banker, matcher: alternation_to_banker },
    PredictionRule { id: 26, name: "gapped-run-to-player", min_rounds: 5, predicts: Player, matcher: gapped_run_to_player },
    PredictionRule { id: 27, name: "gapped-run-to-banker", min_rounds: 5, predicts: Banker, matcher: gapped_run_to_banker },
    // shadowed by id 13 for exact triples and id 1 for longer runs
    PredictionRule { id: 28, name: "tie-run-fallback", min_rounds: 3, predicts: Player, matcher: tie_tail_three },
];

pub fn rule_by_id(id: u32) -> Option<&'static PredictionRule> {
    PREDICTION_RULES.iter().find(|rule| rule.id == id)
}

/// Outcome of the trailing run and its length. None on an empty slice.
pub(crate) fn trailing_run(outcomes: &[Outcome]) -> Option<(Outcome, usize)> {
    let last = *outcomes.last()?;
    let length = outcomes.iter().rev().take_while(|&&o| o == last).count();
    Some((last, length))
}

fn run_of_at_least(outcomes: &[Outcome], wanted: Outcome, length: usize) -> bool {
    matches!(trailing_run(outcomes), Some((o, n)) if o == wanted && n >= length)
}

fn run_of_exactly(outcomes: &[Outcome], wanted: Outcome, length: usize) -> bool {
    matches!(trailing_run(outcomes), Some((o, n)) if o == wanted && n == length)
}

fn tie_run_four(o: &[Outcome]) -> bool {
    run_of_at_least(o, Tie, 4)
}

fn banker_island_tie(o: &[Outcome]) -> bool {
    o.ends_with(&[Banker, Banker, Banker, Tie, Banker, Banker, Banker])
}

fn player_island_tie(o: &[Outcome]) -> bool {
    o.ends_with(&[Player, Player, Player, Tie, Player, Player, Player])
}

fn banker_pair_bridge(o: &[Outcome]) -> bool {
    o.ends_with(&[Banker, Banker, Tie, Banker, Banker])
}

fn player_pair_bridge(o: &[Outcome]) -> bool {
    o.ends_with(&[Player, Player, Tie, Player, Player])
}

fn double_tie_then_player(o: &[Outcome]) -> bool {
    o.ends_with(&[Tie, Tie, Player])
}

fn double_tie_then_banker(o: &[Outcome]) -> bool {
    o.ends_with(&[Tie, Tie, Banker])
}

fn player_run_four(o: &[Outcome]) -> bool {
    run_of_at_least(o, Player, 4)
}

fn banker_run_four(o: &[Outcome]) -> bool {
    run_of_at_least(o, Banker, 4)
}

fn double_tie(o: &[Outcome]) -> bool {
    run_of_exactly(o, Tie, 2)
}

fn player_run_three(o: &[Outcome]) -> bool {
    run_of_exactly(o, Player, 3)
}

fn banker_run_three(o: &[Outcome]) -> bool {
    run_of_exactly(o, Banker, 3)
}

fn tie_run_three(o: &[Outcome]) -> bool {
    run_of_exactly(o, Tie, 3)
}

fn player_tie_player(o: &[Outcome]) -> bool {
    o.ends_with(&[Player, Tie, Player])
}

fn banker_tie_banker(o: &[Outcome]) -> bool {
    o.ends_with(&[Banker, Tie, Banker])
}

fn player_tie_banker(o: &[Outcome]) -> bool {
    o.ends_with(&[Player, Tie, Banker])
}

fn banker_tie_player(o: &[Outcome]) -> bool {
    o.ends_with(&[Banker, Tie, Player])
}

fn player_chain_tie(o: &[Outcome]) -> bool {
    o.ends_with(&[Player, Banker, Player, Tie])
}

fn banker_chain_tie(o: &[Outcome]) -> bool {
    o.ends_with(&[Banker, Player, Banker, Tie])
}

fn player_banker_player(o: &[Outcome]) -> bool {
    o.ends_with(&[Player, Banker, Player])
}

fn double_player(o: &[Outcome]) -> bool {
    run_of_exactly(o, Player, 2)
}

fn double_banker(o: &[Outcome]) -> bool {
    run_of_exactly(o, Banker, 2)
}

fn alternation_to_player(o: &[Outcome]) -> bool {
    o.ends_with(&[Player, Banker, Player, Banker])
}

fn alternation_to_banker(o: &[Outcome]) -> bool {
    o.ends_with(&[Banker, Player, Banker, Player])
}

fn gapped_run_to_player(o: &[Outcome]) -> bool {
    o.ends_with(&[Player, Banker, Tie, Player, Banker])
}

fn gapped_run_to_banker(o: &[Outcome]) -> bool {
    o.ends_with(&[Banker, Player, Tie, Banker, Player])
}

fn tie_tail_three(o: &[Outcome]) -> bool {
    o.ends_with(&[Tie, Tie, Tie])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_hit(outcomes: &[Outcome]) -> Option<&'static PredictionRule> {
        PREDICTION_RULES.iter().find(|rule| rule.matches(outcomes))
    }

    #[test]
    fn test_rule_ids_follow_table_order() {
        let ids: Vec<u32> = PREDICTION_RULES.iter().map(|rule| rule.id).collect();
        let expected: Vec<u32> = (1..=28).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_trailing_run_counts_from_the_end() {
        assert_eq!(trailing_run(&[]), None);
        assert_eq!(trailing_run(&[Banker, Player, Player]), Some((Player, 2)));
        assert_eq!(trailing_run(&[Tie, Tie, Tie]), Some((Tie, 3)));
    }

    #[test]
    fn test_player_run_ladder() {
        let hit = first_hit(&[Banker, Player, Player]).unwrap();
        assert_eq!(hit.id, 21);
        let hit = first_hit(&[Player, Player, Player]).unwrap();
        assert_eq!(hit.id, 11);
        let hit = first_hit(&[Player, Player, Player, Player]).unwrap();
        assert_eq!(hit.id, 8);
        assert_eq!(hit.predicts, Player);
    }

    #[test]
    fn test_tie_run_ladder_flips_to_player_at_four() {
        let hit = first_hit(&[Tie, Tie]).unwrap();
        assert_eq!((hit.id, hit.predicts), (10, Tie));
        let hit = first_hit(&[Tie, Tie, Tie]).unwrap();
        assert_eq!((hit.id, hit.predicts), (13, Tie));
        let hit = first_hit(&[Tie, Tie, Tie, Tie]).unwrap();
        assert_eq!((hit.id, hit.predicts), (1, Player));
    }

    #[test]
    fn test_alternation_needs_a_fourth_round() {
        assert!(first_hit(&[Player, Banker, Player]).is_none());
        let hit = first_hit(&[Player, Banker, Player, Banker]).unwrap();
        assert_eq!((hit.id, hit.predicts), (24, Player));
        let hit = first_hit(&[Player, Banker, Player, Banker, Player]).unwrap();
        assert_eq!((hit.id, hit.predicts), (20, Banker));
    }

    #[test]
    fn test_island_and_bridge_shapes() {
        let hit = first_hit(&[Banker, Banker, Banker, Tie, Banker, Banker, Banker]).unwrap();
        assert_eq!((hit.id, hit.predicts), (2, Banker));
        let hit = first_hit(&[Banker, Banker, Tie, Banker, Banker]).unwrap();
        assert_eq!((hit.id, hit.predicts), (4, Banker));
        let hit = first_hit(&[Player, Player, Tie, Player, Player]).unwrap();
        assert_eq!((hit.id, hit.predicts), (5, Player));
    }

    #[test]
    fn test_tie_sandwiches() {
        let hit = first_hit(&[Player, Tie, Player]).unwrap();
        assert_eq!((hit.id, hit.predicts), (14, Player));
        let hit = first_hit(&[Banker, Tie, Banker]).unwrap();
        assert_eq!((hit.id, hit.predicts), (15, Banker));
        let hit = first_hit(&[Player, Tie, Banker]).unwrap();
        assert_eq!((hit.id, hit.predicts), (16, Tie));
        let hit = first_hit(&[Banker, Tie, Player]).unwrap();
        assert_eq!((hit.id, hit.predicts), (17, Tie));
    }

    #[test]
    fn test_double_tie_then_side_reads_the_breaker() {
        let hit = first_hit(&[Tie, Tie, Player]).unwrap();
        assert_eq!((hit.id, hit.predicts), (6, Player));
        let hit = first_hit(&[Tie, Tie, Banker]).unwrap();
        assert_eq!((hit.id, hit.predicts), (7, Banker));
    }

    #[test]
    fn test_chain_tie_predicts_the_other_side() {
        let hit = first_hit(&[Player, Banker, Player, Tie]).unwrap();
        assert_eq!((hit.id, hit.predicts), (18, Banker));
        let hit = first_hit(&[Banker, Player, Banker, Tie]).unwrap();
        assert_eq!((hit.id, hit.predicts), (19, Player));
    }

    #[test]
    fn test_gapped_run_shapes() {
        let hit = first_hit(&[Player, Banker, Tie, Player, Banker]).unwrap();
        assert_eq!((hit.id, hit.predicts), (26, Player));
        let hit = first_hit(&[Banker, Player, Tie, Banker, Player]).unwrap();
        assert_eq!((hit.id, hit.predicts), (27, Banker));
    }

    #[test]
    fn test_exact_doubles_do_not_fire_on_triples() {
        let hit = first_hit(&[Player, Banker, Banker]).unwrap();
        assert_eq!(hit.id, 22);
        let hit = first_hit(&[Banker, Banker, Banker]).unwrap();
        assert_eq!(hit.id, 12);
    }

    #[test]
    fn test_shadowed_rows_never_win() {
        // same shapes as ids 23, 25 and 28, claimed earlier in the table
        let hit = first_hit(&[Banker, Tie, Tie]).unwrap();
        assert_eq!(hit.id, 10);
        let hit = first_hit(&[Banker, Player, Banker, Player]).unwrap();
        assert_eq!(hit.id, 20);
        let hit = first_hit(&[Player, Tie, Tie, Tie]).unwrap();
        assert_eq!(hit.id, 13);
    }

    #[test]
    fn test_rule_lookup_by_id() {
        let rule = rule_by_id(24).unwrap();
        assert_eq!(rule.name, "alternation-to-player");
        assert!(rule_by_id(99).is_none());
    }
}
