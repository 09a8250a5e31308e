use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::*;

/// Durable string storage the score board is saved into, like a browser's local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub time: u32,
    pub date: NaiveDate,
}

/// Best completion times per ranked difficulty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBoard {
    lists: BTreeMap<Difficulty, Vec<ScoreEntry>>,
}

impl ScoreBoard {
    pub const STORE_KEY: &'static str = "mineboard:scores";
    pub const MAX_ENTRIES: usize = 10;

    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry keeping the list sorted by time, returning its 1-based rank.
    ///
    /// Ties rank after the existing entries. Returns `None` for custom games or when the
    /// time does not make the list.
    pub fn append(&mut self, difficulty: Difficulty, entry: ScoreEntry) -> Option<usize> {
        if !difficulty.is_ranked() {
            log::debug!("Not recording score for unranked difficulty {}", difficulty);
            return None;
        }

        let list = self.lists.entry(difficulty).or_default();
        let position = list.partition_point(|existing| existing.time <= entry.time);
        if position >= Self::MAX_ENTRIES {
            return None;
        }
        list.insert(position, entry);
        list.truncate(Self::MAX_ENTRIES);
        Some(position + 1)
    }

    pub fn list(&self, difficulty: Difficulty) -> &[ScoreEntry] {
        self.lists
            .get(&difficulty)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn best(&self, difficulty: Difficulty) -> Option<ScoreEntry> {
        self.list(difficulty).first().copied()
    }

    pub fn to_json(&self) -> String {
        // maps of plain structs always serialize
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parses stored scores, re-sorting and trimming lists that were edited by hand.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let mut board: Self =
            serde_json::from_str(json).map_err(|err| StoreError::Corrupt(err.to_string()))?;
        board.lists.remove(&Difficulty::Custom);
        for list in board.lists.values_mut() {
            list.sort_by_key(|entry| entry.time);
            list.truncate(Self::MAX_ENTRIES);
        }
        Ok(board)
    }

    /// Loads the board from `store`, a missing key is an empty board.
    pub fn load(store: &impl KeyValueStore) -> Result<Self, StoreError> {
        match store.get(Self::STORE_KEY) {
            Some(json) => Self::from_json(&json),
            None => Ok(Self::new()),
        }
    }

    pub fn persist(&self, store: &mut impl KeyValueStore) -> Result<(), StoreError> {
        store.set(Self::STORE_KEY, self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(time: u32, day: u32) -> ScoreEntry {
        ScoreEntry {
            time,
            date: NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
        }
    }

    #[test]
    fn keeps_ten_fastest_in_order() {
        let mut board = ScoreBoard::new();
        for time in [50, 20, 90, 10, 70, 30, 60, 80, 40, 100, 110] {
            board.append(Difficulty::Easy, entry(time, 1));
        }

        let times: Vec<_> = board.list(Difficulty::Easy).iter().map(|e| e.time).collect();
        assert_eq!(times, [10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        assert_eq!(board.append(Difficulty::Easy, entry(5, 2)), Some(1));
        assert_eq!(board.list(Difficulty::Easy).len(), 10);
        assert_eq!(board.append(Difficulty::Easy, entry(95, 2)), None);
    }

    #[test]
    fn ties_rank_after_existing_entries() {
        let mut board = ScoreBoard::new();
        board.append(Difficulty::Medium, entry(42, 1));

        assert_eq!(board.append(Difficulty::Medium, entry(42, 2)), Some(2));
        assert_eq!(board.best(Difficulty::Medium), Some(entry(42, 1)));
    }

    #[test]
    fn custom_is_never_ranked() {
        let mut board = ScoreBoard::new();

        assert_eq!(board.append(Difficulty::Custom, entry(1, 1)), None);
        assert!(board.list(Difficulty::Custom).is_empty());
    }

    #[test]
    fn json_uses_difficulty_names() {
        let mut board = ScoreBoard::new();
        board.append(Difficulty::Hard, entry(321, 15));

        assert_eq!(board.to_json(), r#"{"hard":[{"time":321,"date":"2026-10-15"}]}"#);
    }

    #[test]
    fn persists_through_store() {
        let mut store = MemoryStore::new();
        assert_eq!(ScoreBoard::load(&store), Ok(ScoreBoard::new()));

        let mut board = ScoreBoard::new();
        board.append(Difficulty::Easy, entry(12, 3));
        board.persist(&mut store).unwrap();

        assert_eq!(ScoreBoard::load(&store), Ok(board));
    }

    #[test]
    fn loading_sorts_and_trims() {
        let json = r#"{"easy":[{"time":9,"date":"2026-10-01"},{"time":3,"date":"2026-10-02"}],"custom":[{"time":1,"date":"2026-10-03"}]}"#;
        let board = ScoreBoard::from_json(json).unwrap();

        assert_eq!(board.list(Difficulty::Easy), [entry(3, 2), entry(9, 1)]);
        assert!(board.list(Difficulty::Custom).is_empty());
    }

    #[test]
    fn corrupt_data_is_reported() {
        assert!(matches!(
            ScoreBoard::from_json("{\"easy\": 3"),
            Err(StoreError::Corrupt(_))
        ));
    }
}
