use thiserror::Error;

use crate::types::{Outcome, MAX_DICE_SUM, MIN_DICE_SUM};

/// Errors surfaced by tracker mutations and snapshot IO.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("dice sum {0} is outside the valid {MIN_DICE_SUM}..={MAX_DICE_SUM} range")]
    SumOutOfRange(u8),

    #[error("outcome {supplied} contradicts {derived} derived from sums {player_sum} vs {banker_sum}")]
    OutcomeMismatch {
        supplied: Outcome,
        derived: Outcome,
        player_sum: u8,
        banker_sum: u8,
    },

    #[error("a round needs an outcome or a pair of dice sums")]
    MissingRoundData,

    #[error("session snapshot is unreadable: {0}")]
    CorruptSnapshot(String),

    #[error("failed to encode session snapshot: {0}")]
    EncodeSnapshot(#[from] serde_json::Error),

    #[error("failed to write session snapshot: {0}")]
    WriteSnapshot(#[from] std::io::Error),
}

impl EngineError {
    /// True for errors caused by bad caller input rather than storage IO.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::SumOutOfRange(_)
                | EngineError::OutcomeMismatch { .. }
                | EngineError::MissingRoundData
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(EngineError::SumOutOfRange(13).is_validation());
        assert!(EngineError::MissingRoundData.is_validation());
        assert!(!EngineError::CorruptSnapshot("truncated".to_string()).is_validation());
    }

    #[test]
    fn test_mismatch_message_names_both_outcomes() {
        let err = EngineError::OutcomeMismatch {
            supplied: Outcome::Banker,
            derived: Outcome::Player,
            player_sum: 10,
            banker_sum: 6,
        };
        let text = err.to_string();
        assert!(text.contains("Banker"));
        assert!(text.contains("Player"));
    }
}
