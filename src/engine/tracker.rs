use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::Utc;
use tracing::{debug, info};

use crate::engine::EngineError;
use crate::patterns::{
    rule_by_id, Advice, PatternCatalog, PatternMatch, Prediction, SuggestionFamily,
};
use crate::persistence::{SessionSnapshot, SnapshotStore};
use crate::types::{
    History, Outcome, PerformanceCounters, Round, Signal, MAX_DICE_SUM, MIN_DICE_SUM,
};

/// What one append did: the stored round, the earlier signal it resolved and
/// the fresh prediction it opened.
#[derive(Debug, Clone)]
pub struct AppendReport {
    pub round: Round,
    pub resolved: Option<Signal>,
    pub opened: Option<PatternMatch>,
}

#[derive(Debug, Clone)]
pub enum UndoReport {
    Undone { round: Round },
    Empty,
}

/// Resolved hit/miss tally for one pattern id.
#[derive(Debug, Clone)]
pub struct PatternStats {
    pub pattern_id: u32,
    pub name: &'static str,
    pub counters: PerformanceCounters,
}

struct Checkpoint {
    history: History,
    signals: Vec<Signal>,
    performance: PerformanceCounters,
}

/// Owns the session state (history, signals, counters) and orchestrates the
/// append cycle: store the round, score the open signal against it, ask the
/// catalog for the next prediction, persist. Every mutation either commits
/// fully (including the snapshot write) or rolls back in memory.
pub struct PredictionTracker {
    history: History,
    signals: Vec<Signal>,
    performance: PerformanceCounters,
    catalog: PatternCatalog,
    store: SnapshotStore,
}

impl PredictionTracker {
    pub fn load(store: SnapshotStore) -> Result<Self, EngineError> {
        let snapshot = store.load_or_init()?;
        let tracker = Self {
            history: History::from_rounds(snapshot.history),
            signals: snapshot.signals,
            performance: snapshot.performance,
            catalog: PatternCatalog::new(),
            store,
        };
        info!(
            "Session loaded: {} rounds, {} signals, accuracy {:.1}%",
            tracker.history.len(),
            tracker.signals.len(),
            tracker.performance.accuracy_pct()
        );
        Ok(tracker)
    }

    /// Record one finished round. The outcome may be supplied directly,
    /// derived from the two dice sums, or both (which must agree).
    pub fn append(
        &mut self,
        outcome: Option<Outcome>,
        sums: Option<(u8, u8)>,
    ) -> Result<AppendReport, EngineError> {
        let outcome = resolve_outcome(outcome, sums)?;
        let checkpoint = self.checkpoint();

        let round = Round::new(Utc::now(), outcome, sums);
        self.history.push(round.clone());

        let resolved = self.resolve_open_signal(outcome);
        let opened = match self.catalog.predict(&self.history) {
            Prediction::Match(matched) => {
                self.signals.push(Signal::open(
                    round.timestamp,
                    matched.pattern_id,
                    matched.predicted,
                ));
                Some(matched)
            }
            _ => None,
        };

        if let Err(err) = self.persist() {
            self.restore(checkpoint);
            return Err(err);
        }
        info!(
            "Round {} recorded ({} rounds total)",
            outcome,
            self.history.len()
        );
        Ok(AppendReport {
            round,
            resolved,
            opened,
        })
    }

    /// Remove the most recent round and every side effect it had: the signal
    /// it opened disappears, and the signal it resolved reopens with its
    /// counter contribution reverted.
    pub fn undo_last(&mut self) -> Result<UndoReport, EngineError> {
        let checkpoint = self.checkpoint();
        let removed = match self.history.pop() {
            Some(round) => round,
            None => return Ok(UndoReport::Empty),
        };

        if self
            .signals
            .last()
            .map(|signal| signal.round_timestamp == removed.timestamp)
            .unwrap_or(false)
        {
            if let Some(signal) = self.signals.pop() {
                if let Some(resolution) = signal.resolution {
                    self.performance.revert(resolution);
                }
                debug!("Dropped the signal opened by the undone round");
            }
        }

        let tail_timestamp = self.history.last().map(|round| round.timestamp);
        if let Some(signal) = self.signals.last_mut() {
            if let (Some(resolution), Some(tail)) = (signal.resolution, tail_timestamp) {
                if signal.round_timestamp == tail {
                    signal.resolution = None;
                    self.performance.revert(resolution);
                    debug!("Reopened the signal the undone round had resolved");
                }
            }
        }

        if let Err(err) = self.persist() {
            self.restore(checkpoint);
            return Err(err);
        }
        info!(
            "Round {} undone ({} rounds remain)",
            removed.outcome,
            self.history.len()
        );
        Ok(UndoReport::Undone { round: removed })
    }

    /// Reset history, signals and counters to an empty session.
    pub fn clear_all(&mut self) -> Result<(), EngineError> {
        let checkpoint = self.checkpoint();
        self.history.clear();
        self.signals.clear();
        self.performance.reset();
        if let Err(err) = self.persist() {
            self.restore(checkpoint);
            return Err(err);
        }
        info!("Session cleared");
        Ok(())
    }

    /// Read-only single-mode evaluation of the current history; never
    /// records a signal.
    pub fn current_prediction(&self) -> Prediction {
        self.catalog.predict(&self.history)
    }

    /// Read-only multi-mode evaluation for the given families.
    pub fn suggestions(&self, families: &[SuggestionFamily]) -> Advice {
        self.catalog.advise(&self.history, families)
    }

    pub fn accuracy(&self) -> f64 {
        self.performance.accuracy_pct()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn performance(&self) -> &PerformanceCounters {
        &self.performance
    }

    pub fn open_signal(&self) -> Option<&Signal> {
        self.signals.iter().rev().find(|signal| signal.is_open())
    }

    /// Hit/miss tallies per pattern over the resolved signals, ordered by
    /// pattern id.
    pub fn per_pattern_breakdown(&self) -> Vec<PatternStats> {
        let mut stats: BTreeMap<u32, PatternStats> = BTreeMap::new();
        for signal in &self.signals {
            let resolution = match signal.resolution {
                Some(resolution) => resolution,
                None => continue,
            };
            let entry = stats.entry(signal.pattern_id).or_insert_with(|| PatternStats {
                pattern_id: signal.pattern_id,
                name: rule_by_id(signal.pattern_id)
                    .map(|rule| rule.name)
                    .unwrap_or("unknown"),
                counters: PerformanceCounters::default(),
            });
            entry.counters.record(resolution);
        }
        stats.into_values().collect()
    }

    /// History as CSV text (timestamp,outcome,player_sum,banker_sum), a pure
    /// read-only projection.
    pub fn export_csv(&self) -> String {
        let mut out = String::from("timestamp,outcome,player_sum,banker_sum\n");
        for round in self.history.rounds() {
            let (player_sum, banker_sum) = match round.sums {
                Some((p, b)) => (p.to_string(), b.to_string()),
                None => (String::new(), String::new()),
            };
            let _ = writeln!(
                out,
                "{},{},{},{}",
                round.timestamp.to_rfc3339(),
                round.outcome,
                player_sum,
                banker_sum
            );
        }
        out
    }

    fn resolve_open_signal(&mut self, actual: Outcome) -> Option<Signal> {
        let open = self.signals.iter_mut().rev().find(|signal| signal.is_open())?;
        let resolution = open.resolve(actual);
        let resolved = open.clone();
        self.performance.record(resolution);
        debug!(
            "Signal for pattern {} resolved as {:?} against {}",
            resolved.pattern_id, resolution, actual
        );
        Some(resolved)
    }

    fn persist(&self) -> Result<(), EngineError> {
        let snapshot = SessionSnapshot {
            history: self.history.rounds().to_vec(),
            signals: self.signals.clone(),
            performance: self.performance,
        };
        self.store.save(&snapshot)
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            history: self.history.clone(),
            signals: self.signals.clone(),
            performance: self.performance,
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.history = checkpoint.history;
        self.signals = checkpoint.signals;
        self.performance = checkpoint.performance;
    }
}

fn resolve_outcome(
    outcome: Option<Outcome>,
    sums: Option<(u8, u8)>,
) -> Result<Outcome, EngineError> {
    match (outcome, sums) {
        (None, None) => Err(EngineError::MissingRoundData),
        (supplied, Some((player_sum, banker_sum))) => {
            for sum in [player_sum, banker_sum] {
                if !(MIN_DICE_SUM..=MAX_DICE_SUM).contains(&sum) {
                    return Err(EngineError::SumOutOfRange(sum));
                }
            }
            let derived = if player_sum > banker_sum {
                Outcome::Player
            } else if banker_sum > player_sum {
                Outcome::Banker
            } else {
                Outcome::Tie
            };
            match supplied {
                Some(outcome) if outcome != derived => Err(EngineError::OutcomeMismatch {
                    supplied: outcome,
                    derived,
                    player_sum,
                    banker_sum,
                }),
                _ => Ok(derived),
            }
        }
        (Some(outcome), None) => Ok(outcome),
    }
}
