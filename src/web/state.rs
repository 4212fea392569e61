use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, Mutex};

use crate::config::AdvisorConfig;
use crate::engine::PredictionTracker;
use crate::types::Outcome;

/// Events pushed to WebSocket clients after every mutation so a UI can
/// re-render without polling.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum StateEvent {
    RoundAppended {
        timestamp: DateTime<Utc>,
        outcome: Outcome,
    },
    RoundUndone {
        timestamp: DateTime<Utc>,
        outcome: Outcome,
    },
    SessionCleared,
}

/// Combined application state for the web server. The tracker sits behind
/// one mutex so every mutation, including its snapshot write, runs as a
/// single critical section.
#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<Mutex<PredictionTracker>>,
    pub config: Arc<AdvisorConfig>,
    pub events: broadcast::Sender<StateEvent>,
}

impl AppState {
    pub fn new(tracker: PredictionTracker, config: AdvisorConfig) -> Self {
        let (events, _) = broadcast::channel(100);
        Self {
            tracker: Arc::new(Mutex::new(tracker)),
            config: Arc::new(config),
            events,
        }
    }

    pub fn notify(&self, event: StateEvent) {
        let _ = self.events.send(event);
    }
}
