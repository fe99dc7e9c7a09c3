//! Concurrent in-memory leaderboard
//!
//! Scores live in a sharded concurrent map and do not survive a restart.
//! Updates to a single user are atomic; distinct users never contend on a
//! global lock.

use dashmap::DashMap;
use serde::Serialize;

/// How an update changes a user's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Overwrite the score with the given points.
    Set,
    /// Add the points to the current score (0 for a new user).
    Increment,
}

/// Result of a single leaderboard update.
#[derive(Debug, Clone, Copy)]
pub struct UpdateOutcome {
    /// True when this update created the entry.
    pub is_new: bool,
    /// The score after the update.
    pub score: i64,
}

/// One row of a ranked leaderboard snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedUser {
    pub username: String,
    pub score: i64,
    pub rank: usize,
    pub is_new: bool,
}

/// Concurrent leaderboard keyed by username (case-sensitive).
pub struct Leaderboard {
    scores: DashMap<String, i64>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            scores: DashMap::new(),
        }
    }

    /// Apply an update to a single user.
    ///
    /// The read-modify-write is atomic per key, so concurrent increments to
    /// the same user all land. Increments saturate rather than overflow.
    pub fn update(&self, username: &str, points: i64, mode: UpdateMode) -> UpdateOutcome {
        let mut is_new = false;
        let entry = self
            .scores
            .entry(username.to_string())
            .and_modify(|score| match mode {
                UpdateMode::Set => *score = points,
                UpdateMode::Increment => *score = score.saturating_add(points),
            })
            .or_insert_with(|| {
                is_new = true;
                points
            });

        UpdateOutcome {
            is_new,
            score: *entry,
        }
    }

    /// Current standings, best score first.
    ///
    /// Ties order by username so the ranking is stable across calls. Ranks
    /// are positional starting at 1. `is_new` is always false here; the
    /// caller that just created an entry marks it before responding.
    pub fn snapshot(&self) -> Vec<RankedUser> {
        let mut entries: Vec<(String, i64)> = self
            .scores
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();

        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        entries
            .into_iter()
            .enumerate()
            .map(|(index, (username, score))| RankedUser {
                username,
                score,
                rank: index + 1,
                is_new: false,
            })
            .collect()
    }

    /// Number of users on the board.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn first_update_creates_entry() {
        let board = Leaderboard::new();
        let outcome = board.update("alice", 30, UpdateMode::Increment);
        assert!(outcome.is_new);
        assert_eq!(outcome.score, 30);
    }

    #[test]
    fn increment_accumulates() {
        let board = Leaderboard::new();
        board.update("alice", 30, UpdateMode::Increment);
        let outcome = board.update("alice", 20, UpdateMode::Increment);
        assert!(!outcome.is_new);
        assert_eq!(outcome.score, 50);
    }

    #[test]
    fn set_overwrites_instead_of_adding() {
        let board = Leaderboard::new();
        board.update("alice", 30, UpdateMode::Increment);

        let outcome = board.update("alice", 50, UpdateMode::Set);
        assert_eq!(outcome.score, 50);

        let outcome = board.update("alice", 10, UpdateMode::Set);
        assert_eq!(outcome.score, 10);
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let board = Leaderboard::new();
        board.update("alice", 10, UpdateMode::Increment);
        let outcome = board.update("Alice", 20, UpdateMode::Increment);
        assert!(outcome.is_new);
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn snapshot_ranks_by_descending_score() {
        let board = Leaderboard::new();
        board.update("bronze", 10, UpdateMode::Set);
        board.update("gold", 100, UpdateMode::Set);
        board.update("silver", 50, UpdateMode::Set);

        let snapshot = board.snapshot();
        let names: Vec<&str> = snapshot.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["gold", "silver", "bronze"]);
        let ranks: Vec<usize> = snapshot.iter().map(|u| u.rank).collect();
        assert_eq!(ranks, [1, 2, 3]);
        assert!(snapshot.iter().all(|u| !u.is_new));
    }

    #[test]
    fn ties_order_by_username() {
        let board = Leaderboard::new();
        board.update("zoe", 50, UpdateMode::Set);
        board.update("amy", 50, UpdateMode::Set);

        let snapshot = board.snapshot();
        assert_eq!(snapshot[0].username, "amy");
        assert_eq!(snapshot[0].rank, 1);
        assert_eq!(snapshot[1].username, "zoe");
        assert_eq!(snapshot[1].rank, 2);
    }

    #[test]
    fn empty_board_snapshots_empty() {
        let board = Leaderboard::new();
        assert!(board.snapshot().is_empty());
        assert!(board.is_empty());
    }

    #[test]
    fn increment_saturates_at_max() {
        let board = Leaderboard::new();
        board.update("alice", i64::MAX - 1, UpdateMode::Set);
        let outcome = board.update("alice", 10, UpdateMode::Increment);
        assert_eq!(outcome.score, i64::MAX);
    }

    #[test]
    fn parallel_increments_to_one_user_all_land() {
        let board = Arc::new(Leaderboard::new());

        let mut handles = Vec::new();
        for _ in 0..100 {
            let board = Arc::clone(&board);
            handles.push(std::thread::spawn(move || {
                board.update("busy", 1, UpdateMode::Increment);
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = board.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].score, 100);
    }

    #[test]
    fn parallel_updates_to_distinct_users() {
        let board = Arc::new(Leaderboard::new());

        let mut handles = Vec::new();
        for i in 0..16 {
            let board = Arc::clone(&board);
            handles.push(std::thread::spawn(move || {
                let name = format!("user-{}", i);
                for _ in 0..50 {
                    board.update(&name, 2, UpdateMode::Increment);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(board.len(), 16);
        assert!(board.snapshot().iter().all(|u| u.score == 100));
    }
}
