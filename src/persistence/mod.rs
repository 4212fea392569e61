use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::engine::EngineError;
use crate::types::{PerformanceCounters, Round, Signal};

/// On-disk session document: full history, every signal and the running
/// counters in one pretty-printed JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub history: Vec<Round>,
    pub signals: Vec<Signal>,
    pub performance: PerformanceCounters,
}

/// File-backed store for the session snapshot. Writes go through a sibling
/// temp file and a rename so a crash never leaves a half-written document.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, starting empty when the file is missing and
    /// resetting to empty when it cannot be decoded.
    pub fn load_or_init(&self) -> Result<SessionSnapshot, EngineError> {
        match self.load() {
            Ok(snapshot) => Ok(snapshot),
            Err(EngineError::CorruptSnapshot(reason)) => {
                warn!(
                    "Resetting session snapshot at {}: {}",
                    self.path.display(),
                    reason
                );
                let empty = SessionSnapshot::default();
                self.save(&empty)?;
                Ok(empty)
            }
            Err(err) => Err(err),
        }
    }

    fn load(&self) -> Result<SessionSnapshot, EngineError> {
        if !self.path.exists() {
            info!(
                "No session snapshot at {}, starting empty",
                self.path.display()
            );
            let empty = SessionSnapshot::default();
            self.save(&empty)?;
            return Ok(empty);
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| EngineError::CorruptSnapshot(e.to_string()))?;
        let snapshot = serde_json::from_str(&raw)
            .map_err(|e| EngineError::CorruptSnapshot(e.to_string()))?;
        debug!("Loaded session snapshot from {}", self.path.display());
        Ok(snapshot)
    }

    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<(), EngineError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let encoded = serde_json::to_string_pretty(snapshot)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, encoded)?;
        fs::rename(&tmp_path, &self.path)?;
        debug!("Persisted session snapshot to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome;
    use chrono::Utc;

    fn temp_store(name: &str) -> SnapshotStore {
        let mut path = std::env::temp_dir();
        path.push(format!("bacbo-advisor-{}-{}", name, std::process::id()));
        path.push("session.json");
        SnapshotStore::new(path)
    }

    fn cleanup(store: &SnapshotStore) {
        if let Some(parent) = store.path().parent() {
            let _ = fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn test_missing_file_initializes_empty_and_persists() {
        let store = temp_store("missing");
        cleanup(&store);

        let snapshot = store.load_or_init().unwrap();
        assert!(snapshot.history.is_empty());
        assert!(snapshot.signals.is_empty());
        assert_eq!(snapshot.performance.total, 0);
        assert!(store.path().exists());
        cleanup(&store);
    }

    #[test]
    fn test_round_trip_preserves_the_document() {
        let store = temp_store("round-trip");
        cleanup(&store);

        let mut snapshot = SessionSnapshot::default();
        let stamp = Utc::now();
        snapshot
            .history
            .push(Round::new(stamp, Outcome::Player, Some((9, 4))));
        snapshot.signals.push(Signal::open(stamp, 21, Outcome::Player));
        snapshot.performance.total = 3;
        snapshot.performance.hits = 2;
        snapshot.performance.misses = 1;
        store.save(&snapshot).unwrap();

        let loaded = store.load_or_init().unwrap();
        assert_eq!(loaded.history.len(), 1);
        assert_eq!(loaded.history[0].outcome, Outcome::Player);
        assert_eq!(loaded.history[0].sums, Some((9, 4)));
        assert_eq!(loaded.signals.len(), 1);
        assert_eq!(loaded.signals[0].pattern_id, 21);
        assert!(loaded.signals[0].is_open());
        assert_eq!(loaded.performance.hits, 2);
        cleanup(&store);
    }

    #[test]
    fn test_corrupt_file_resets_to_empty() {
        let store = temp_store("corrupt");
        cleanup(&store);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        let snapshot = store.load_or_init().unwrap();
        assert!(snapshot.history.is_empty());
        assert_eq!(snapshot.performance.total, 0);

        // the reset also rewrites the file with a clean document
        let reloaded = store.load_or_init().unwrap();
        assert!(reloaded.signals.is_empty());
        cleanup(&store);
    }

    #[test]
    fn test_wire_field_names_match_the_document_shape() {
        let mut snapshot = SessionSnapshot::default();
        snapshot.signals.push(Signal::open(Utc::now(), 8, Outcome::Player));
        let encoded = serde_json::to_string_pretty(&snapshot).unwrap();
        assert!(encoded.contains("\"history\""));
        assert!(encoded.contains("\"patternId\""));
        assert!(encoded.contains("\"prediction\""));
        assert!(encoded.contains("\"performance\""));
    }
}
