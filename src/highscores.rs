//! High score leaderboard
//!
//! Built from the stored user records; the title screen shows the top rows.

use serde::{Deserialize, Serialize};

/// Number of rows the title screen shows
pub const LEADERBOARD_ROWS: usize = 8;

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub highest_score: u64,
}

/// All players ordered by highest score, best first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from unordered `(username, highest_score)` pairs.
    /// Sorted descending by score; equal scores fall back to username order.
    pub fn from_scores<I, S>(scores: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut entries: Vec<LeaderboardEntry> = scores
            .into_iter()
            .map(|(username, highest_score)| LeaderboardEntry {
                username: username.into(),
                highest_score,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.highest_score
                .cmp(&a.highest_score)
                .then_with(|| a.username.cmp(&b.username))
        });
        Self { entries }
    }

    /// The rows worth showing
    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// 1-indexed position of a player, if present
    pub fn rank_of(&self, username: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.username == username)
            .map(|i| i + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.highest_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_best_first() {
        let board = Leaderboard::from_scores([("ann", 120), ("bob", 900), ("cy", 450)]);
        let names: Vec<&str> = board.entries.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["bob", "cy", "ann"]);
        assert_eq!(board.top_score(), Some(900));
        assert_eq!(board.rank_of("ann"), Some(3));
        assert_eq!(board.rank_of("dee"), None);
    }

    #[test]
    fn test_ties_break_by_name() {
        let board = Leaderboard::from_scores([("zed", 10), ("amy", 10)]);
        assert_eq!(board.entries[0].username, "amy");
    }

    #[test]
    fn test_top_rows() {
        let board = Leaderboard::from_scores((0..12u64).map(|i| (format!("p{i:02}"), i * 10)));
        let top = board.top(LEADERBOARD_ROWS);
        assert_eq!(top.len(), 8);
        assert_eq!(top[0].highest_score, 110);
        assert_eq!(board.top(50).len(), 12);
    }

    #[test]
    fn test_empty() {
        let board = Leaderboard::new();
        assert!(board.is_empty());
        assert_eq!(board.top_score(), None);
        assert!(board.top(LEADERBOARD_ROWS).is_empty());
    }
}
