use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a single Bac Bo round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Player,
    Banker,
    Tie,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Player => "Player",
            Outcome::Banker => "Banker",
            Outcome::Tie => "Tie",
        }
    }

    pub fn all() -> [Outcome; 3] {
        [Outcome::Player, Outcome::Banker, Outcome::Tie]
    }

    /// Accepts full names and single-letter shorthand, case-insensitive.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "player" | "p" => Some(Outcome::Player),
            "banker" | "b" => Some(Outcome::Banker),
            "tie" | "t" => Some(Outcome::Tie),
            _ => None,
        }
    }

    pub fn is_tie(&self) -> bool {
        matches!(self, Outcome::Tie)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
