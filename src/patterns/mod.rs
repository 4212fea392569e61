pub mod color;
pub mod combo;
pub mod sums;
pub mod table;
pub mod tie;

pub use table::{rule_by_id, PredictionRule, PREDICTION_RULES};

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::types::{History, Outcome};

/// Fewest rounds either analysis mode will look at. Below this the catalog
/// reports insufficient data instead of a match.
pub const MIN_ROUNDS_FOR_ANALYSIS: usize = 2;

/// A prediction table hit: which rule fired and what it expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatternMatch {
    #[serde(rename = "patternId")]
    pub pattern_id: u32,
    pub name: &'static str,
    pub predicted: Outcome,
}

/// Result of single-prediction evaluation over the current history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prediction {
    InsufficientData,
    NoMatch,
    Match(PatternMatch),
}

impl Prediction {
    pub fn as_match(&self) -> Option<&PatternMatch> {
        match self {
            Prediction::Match(matched) => Some(matched),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionFamily {
    Color,
    Sum,
    Tie,
    Combo,
}

impl SuggestionFamily {
    pub fn all() -> [SuggestionFamily; 4] {
        [
            SuggestionFamily::Color,
            SuggestionFamily::Sum,
            SuggestionFamily::Tie,
            SuggestionFamily::Combo,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionFamily::Color => "color",
            SuggestionFamily::Sum => "sum",
            SuggestionFamily::Tie => "tie",
            SuggestionFamily::Combo => "combo",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "color" | "colors" => Some(SuggestionFamily::Color),
            "sum" | "sums" => Some(SuggestionFamily::Sum),
            "tie" | "ties" => Some(SuggestionFamily::Tie),
            "combo" | "combination" => Some(SuggestionFamily::Combo),
            _ => None,
        }
    }

    /// Parse a comma-separated family filter, deduplicated in input order.
    /// Empty input selects every family; an unknown name is returned as the
    /// error value.
    pub fn parse_list(raw: &str) -> Result<Vec<SuggestionFamily>, String> {
        if raw.trim().is_empty() {
            return Ok(SuggestionFamily::all().to_vec());
        }
        let mut families = Vec::new();
        for part in raw.split(',') {
            match SuggestionFamily::from_str(part) {
                Some(family) => {
                    if !families.contains(&family) {
                        families.push(family);
                    }
                }
                None => return Err(part.trim().to_string()),
            }
        }
        Ok(families)
    }
}

impl fmt::Display for SuggestionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One advisory line produced by a heuristic family.
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub family: SuggestionFamily,
    pub message: String,
}

impl Suggestion {
    pub fn new(family: SuggestionFamily, message: String) -> Self {
        Self { family, message }
    }
}

/// Result of multi-suggestion evaluation.
#[derive(Debug, Clone)]
pub enum Advice {
    InsufficientData,
    Suggestions(Vec<Suggestion>),
}

/// Ordered, data-driven rule catalog over the trailing outcome window.
/// Single-prediction mode walks the priority table and stops at the first
/// match; multi-suggestion mode unions independent heuristic families.
#[derive(Debug, Clone, Copy)]
pub struct PatternCatalog {
    rules: &'static [PredictionRule],
}

impl PatternCatalog {
    pub fn new() -> Self {
        Self {
            rules: PREDICTION_RULES,
        }
    }

    pub fn rules(&self) -> &'static [PredictionRule] {
        self.rules
    }

    pub fn predict(&self, history: &History) -> Prediction {
        if history.len() < MIN_ROUNDS_FOR_ANALYSIS {
            return Prediction::InsufficientData;
        }
        let outcomes = history.outcomes();
        match self.rules.iter().find(|rule| rule.matches(&outcomes)) {
            Some(rule) => {
                debug!(
                    "pattern {} ({}) matched at {} rounds, predicting {}",
                    rule.id,
                    rule.name,
                    outcomes.len(),
                    rule.predicts
                );
                Prediction::Match(PatternMatch {
                    pattern_id: rule.id,
                    name: rule.name,
                    predicted: rule.predicts,
                })
            }
            None => Prediction::NoMatch,
        }
    }

    pub fn advise(&self, history: &History, families: &[SuggestionFamily]) -> Advice {
        if history.len() < MIN_ROUNDS_FOR_ANALYSIS {
            return Advice::InsufficientData;
        }
        let mut suggestions = Vec::new();
        for family in families {
            let batch = match family {
                SuggestionFamily::Color => color::analyze(history),
                SuggestionFamily::Sum => sums::analyze(history),
                SuggestionFamily::Tie => tie::analyze(history),
                SuggestionFamily::Combo => combo::analyze(history),
            };
            suggestions.extend(batch);
        }
        Advice::Suggestions(suggestions)
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Round;
    use chrono::Utc;

    fn history_of(outcomes: &[Outcome]) -> History {
        let mut history = History::new();
        for &outcome in outcomes {
            history.push(Round::new(Utc::now(), outcome, None));
        }
        history
    }

    #[test]
    fn test_short_history_is_insufficient_for_both_modes() {
        let catalog = PatternCatalog::new();
        let empty = History::new();
        let one = history_of(&[Outcome::Player]);

        assert_eq!(catalog.predict(&empty), Prediction::InsufficientData);
        assert_eq!(catalog.predict(&one), Prediction::InsufficientData);
        assert!(matches!(
            catalog.advise(&one, &SuggestionFamily::all()),
            Advice::InsufficientData
        ));
    }

    #[test]
    fn test_predict_returns_the_highest_priority_match() {
        let catalog = PatternCatalog::new();
        let history = history_of(&[Outcome::Player, Outcome::Player, Outcome::Player, Outcome::Player]);

        let matched = match catalog.predict(&history) {
            Prediction::Match(m) => m,
            other => panic!("expected a match, got {:?}", other),
        };
        assert_eq!(matched.pattern_id, 8);
        assert_eq!(matched.predicted, Outcome::Player);
    }

    #[test]
    fn test_predict_reports_no_match_on_uncovered_shape() {
        let catalog = PatternCatalog::new();
        let history = history_of(&[Outcome::Player, Outcome::Banker]);

        assert_eq!(catalog.predict(&history), Prediction::NoMatch);
    }

    #[test]
    fn test_advise_respects_the_family_filter() {
        let catalog = PatternCatalog::new();
        let history = history_of(&[Outcome::Tie, Outcome::Player, Outcome::Player]);

        let advice = catalog.advise(&history, &[SuggestionFamily::Tie]);
        let suggestions = match advice {
            Advice::Suggestions(s) => s,
            Advice::InsufficientData => panic!("expected suggestions"),
        };
        assert!(!suggestions.is_empty());
        assert!(suggestions.iter().all(|s| s.family == SuggestionFamily::Tie));
    }

    #[test]
    fn test_family_parsing_round_trips() {
        for family in SuggestionFamily::all() {
            assert_eq!(SuggestionFamily::from_str(family.as_str()), Some(family));
        }
        assert_eq!(SuggestionFamily::from_str("Colors"), Some(SuggestionFamily::Color));
        assert_eq!(SuggestionFamily::from_str("dice"), None);
    }

    #[test]
    fn test_family_list_parsing() {
        assert_eq!(
            SuggestionFamily::parse_list("").unwrap(),
            SuggestionFamily::all().to_vec()
        );
        assert_eq!(
            SuggestionFamily::parse_list("tie, color,tie").unwrap(),
            vec![SuggestionFamily::Tie, SuggestionFamily::Color]
        );
        assert_eq!(SuggestionFamily::parse_list("color,dice").unwrap_err(), "dice");
    }
}
