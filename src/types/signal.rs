use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Hit,
    Miss,
}

/// A recorded prediction awaiting (or holding) confirmation against the
/// outcome that followed it. Joined to its spawning round by timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(rename = "timestamp")]
    pub round_timestamp: DateTime<Utc>,
    #[serde(rename = "patternId")]
    pub pattern_id: u32,
    #[serde(rename = "prediction")]
    pub predicted: Outcome,
    pub resolution: Option<Resolution>,
}

impl Signal {
    pub fn open(round_timestamp: DateTime<Utc>, pattern_id: u32, predicted: Outcome) -> Self {
        Self {
            round_timestamp,
            pattern_id,
            predicted,
            resolution: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.resolution.is_none()
    }

    /// Settles an open signal against the next real outcome. Returns the
    /// resolution that was recorded.
    pub fn resolve(&mut self, actual: Outcome) -> Resolution {
        let resolution = if self.predicted == actual {
            Resolution::Hit
        } else {
            Resolution::Miss
        };
        self.resolution = Some(resolution);
        resolution
    }
}

/// Cumulative hit/miss tally over resolved signals. `total` always equals
/// `hits + misses`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceCounters {
    pub total: u64,
    pub hits: u64,
    pub misses: u64,
}

impl PerformanceCounters {
    pub fn record(&mut self, resolution: Resolution) {
        self.total += 1;
        match resolution {
            Resolution::Hit => self.hits += 1,
            Resolution::Miss => self.misses += 1,
        }
    }

    /// Undo compensation. Floored at zero rather than allowed to wrap.
    pub fn revert(&mut self, resolution: Resolution) {
        self.total = self.total.saturating_sub(1);
        match resolution {
            Resolution::Hit => self.hits = self.hits.saturating_sub(1),
            Resolution::Miss => self.misses = self.misses.saturating_sub(1),
        }
    }

    pub fn accuracy_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.hits as f64 / self.total as f64 * 100.0
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
