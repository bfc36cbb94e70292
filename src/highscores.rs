//! High score leaderboard system
//!
//! Persisted under its own storage key, tracks each player's best score
//! and keeps the top 10.

use serde::{Deserialize, Serialize};

/// Maximum number of players to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    /// Player's best score
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    #[serde(default)]
    pub timestamp: f64,
}

/// Best score per player, sorted descending
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    const STORAGE_KEY: &'static str = "leaderboard";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// 1-indexed rank of `name`, if listed
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name).map(|i| i + 1)
    }

    /// Record a finished game. Only a player's best score is kept.
    /// Returns the player's rank afterwards (1-indexed), or None if they
    /// are not on the board.
    pub fn record(&mut self, name: &str, score: u64, timestamp: f64) -> Option<usize> {
        if score == 0 {
            return None;
        }

        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                if score > entry.score {
                    entry.score = score;
                    entry.timestamp = timestamp;
                }
            }
            None => self.entries.push(LeaderboardEntry {
                name: name.to_string(),
                score,
                timestamp,
            }),
        }

        // Stable sort keeps earlier record holders ahead on ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);

        self.rank_of(name)
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn load() -> Self {
        match crate::persistence::load_json::<Leaderboard>(Self::STORAGE_KEY) {
            Some(board) => {
                log::info!("Loaded {} leaderboard entries", board.entries.len());
                board
            }
            None => {
                log::info!("No leaderboard found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self) {
        if crate::persistence::save_json(Self::STORAGE_KEY, self) {
            log::info!("Leaderboard saved ({} entries)", self.entries.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_score_ignored() {
        let mut board = Leaderboard::new();
        assert_eq!(board.record("ada", 0, 0.0), None);
        assert!(board.entries.is_empty());
        assert_eq!(board.top_score(), None);
    }

    #[test]
    fn test_keeps_best_per_player() {
        let mut board = Leaderboard::new();
        assert_eq!(board.record("ada", 100, 1.0), Some(1));
        assert_eq!(board.record("bob", 200, 2.0), Some(1));
        assert_eq!(board.record("ada", 50, 3.0), Some(2));
        assert_eq!(board.entries.len(), 2);
        assert_eq!(board.entries[1].score, 100);
        assert_eq!(board.entries[1].timestamp, 1.0);

        assert_eq!(board.record("ada", 300, 4.0), Some(1));
        assert_eq!(board.top_score(), Some(300));
        assert_eq!(board.rank_of("bob"), Some(2));
    }

    #[test]
    fn test_keeps_top_ten() {
        let mut board = Leaderboard::new();
        for i in 1..=12u64 {
            board.record(&format!("p{i}"), i * 10, i as f64);
        }
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(board.top_score(), Some(120));
        assert_eq!(board.rank_of("p1"), None);
        assert_eq!(board.rank_of("p2"), None);

        // Too low to make the board
        assert_eq!(board.record("late", 5, 13.0), None);
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut board = Leaderboard::new();
        board.record("ada", 70, 0.0);
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json[0]["name"], "ada");
        assert_eq!(json[0]["score"], 70);

        let legacy: Leaderboard = serde_json::from_str(r#"[{"name":"bob","score":5}]"#).unwrap();
        assert_eq!(legacy.top_score(), Some(5));
    }

    #[test]
    fn test_save_and_load() {
        let mut board = Leaderboard::new();
        board.record("ada", 70, 0.0);
        board.save();
        assert_eq!(Leaderboard::load().entries, board.entries);
    }
}
