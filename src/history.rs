//! Match history
//!
//! Every finished match is recorded with the time it ended. Persisted as a
//! JSON array under a single storage key.

use serde::{Deserialize, Serialize};

use crate::error::{PongError, Result};
use crate::platform::storage::{KeyValueStore, load_json, save_json};
use crate::sim::{GameMode, MatchResult, PlayerResult};

/// A single history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Unix timestamp (ms) when the match ended
    pub timestamp: f64,
    pub player1: PlayerResult,
    pub player2: PlayerResult,
    pub mode: GameMode,
}

/// Finished matches, oldest first internally
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchHistory {
    records: Vec<MatchRecord>,
}

impl MatchHistory {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "pongGameHistory";

    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished match. A record with the same timestamp is replaced.
    pub fn add_result(&mut self, result: &MatchResult, timestamp: f64) -> Result<()> {
        for player in [&result.player1, &result.player2] {
            if player.name.trim().is_empty() {
                return Err(PongError::InvalidArgument(
                    "both players need a name".into(),
                ));
            }
        }
        if !timestamp.is_finite() {
            return Err(PongError::InvalidArgument(format!(
                "invalid timestamp {timestamp}"
            )));
        }

        let record = MatchRecord {
            timestamp,
            player1: result.player1.clone(),
            player2: result.player2.clone(),
            mode: result.mode,
        };

        match self
            .records
            .binary_search_by(|r| r.timestamp.total_cmp(&timestamp))
        {
            Ok(i) => self.records[i] = record,
            Err(i) => self.records.insert(i, record),
        }
        Ok(())
    }

    /// Newest first
    pub fn entries(&self) -> impl Iterator<Item = &MatchRecord> {
        self.records.iter().rev()
    }

    pub fn latest(&self) -> Option<&MatchRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load from storage. A missing key is an empty history.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let mut history: Self = load_json(store, Self::STORAGE_KEY)?.unwrap_or_default();
        history
            .records
            .sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        history.records.dedup_by(|later, earlier| {
            if later.timestamp == earlier.timestamp {
                std::mem::swap(later, earlier);
                true
            } else {
                false
            }
        });
        log::info!("Loaded {} history records", history.records.len());
        Ok(history)
    }

    /// Load, falling back to an empty history when the stored data is bad
    pub fn load_or_default(store: &dyn KeyValueStore) -> Self {
        Self::load(store).unwrap_or_else(|e| {
            log::warn!("Ignoring stored history: {}", e);
            Self::new()
        })
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("History saved ({} records)", self.records.len());
        Ok(())
    }

    /// Forget every record, in memory and in storage
    pub fn clear(&mut self, store: &mut dyn KeyValueStore) -> Result<()> {
        self.records.clear();
        store.remove(Self::STORAGE_KEY)
    }
}

/// Current Unix time in ms
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    fn result(p1: &str, s1: u32, p2: &str, s2: u32, mode: GameMode) -> MatchResult {
        MatchResult {
            player1: PlayerResult {
                name: p1.into(),
                score: s1,
            },
            player2: PlayerResult {
                name: p2.into(),
                score: s2,
            },
            mode,
        }
    }

    #[test]
    fn test_newest_first() {
        let mut history = MatchHistory::new();
        history
            .add_result(&result("Ada", 5, "Bob", 3, GameMode::TwoPlayers), 2000.0)
            .unwrap();
        history
            .add_result(&result("Ada", 1, "CPU", 5, GameMode::SinglePlayer), 1000.0)
            .unwrap();
        history
            .add_result(&result("Cy", 5, "Di", 4, GameMode::TwoPlayers), 3000.0)
            .unwrap();

        let stamps: Vec<f64> = history.entries().map(|r| r.timestamp).collect();
        assert_eq!(stamps, vec![3000.0, 2000.0, 1000.0]);
        assert_eq!(history.latest().unwrap().player1.name, "Cy");
    }

    #[test]
    fn test_same_timestamp_replaces() {
        let mut history = MatchHistory::new();
        history
            .add_result(&result("Ada", 5, "Bob", 3, GameMode::TwoPlayers), 1000.0)
            .unwrap();
        history
            .add_result(&result("Ada", 2, "Bob", 5, GameMode::TwoPlayers), 1000.0)
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().unwrap().player2.score, 5);
    }

    #[test]
    fn test_rejects_blank_names() {
        let mut history = MatchHistory::new();
        let err = history.add_result(&result("  ", 5, "Bob", 3, GameMode::TwoPlayers), 1.0);
        assert!(matches!(err, Err(PongError::InvalidArgument(_))));
        assert!(history.is_empty());
    }

    #[test]
    fn test_save_load_clear() {
        let mut store = MemoryStore::new();
        let mut history = MatchHistory::new();
        history
            .add_result(&result("Ada", 5, "CPU", 2, GameMode::SinglePlayer), 42.0)
            .unwrap();
        history.save(&mut store).unwrap();

        let json = store.get(MatchHistory::STORAGE_KEY).unwrap().unwrap();
        assert!(json.contains("\"Single Player\""));

        let loaded = MatchHistory::load(&store).unwrap();
        assert_eq!(loaded, history);

        history.clear(&mut store).unwrap();
        assert!(history.is_empty());
        assert!(MatchHistory::load(&store).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_mode_is_rejected_on_load() {
        let mut store = MemoryStore::new();
        store
            .set(
                MatchHistory::STORAGE_KEY,
                r#"[{"timestamp":1.0,"player1":{"name":"A","score":1},"player2":{"name":"B","score":2},"mode":"Three Players"}]"#,
            )
            .unwrap();
        assert!(MatchHistory::load(&store).is_err());
        assert!(MatchHistory::load_or_default(&store).is_empty());
    }
}
