//! High score leaderboard
//!
//! The local table keeps the top 10. The shown leaderboard combines it with
//! the remote collection, keeping the top 20.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::format_duration;
use crate::stats::GameStats;

/// Maximum number of entries in the local table
pub const MAX_LOCAL_SCORES: usize = 10;
/// Maximum number of entries in the merged leaderboard
pub const MAX_MERGED_SCORES: usize = 20;
/// Name used when the player leaves theirs blank
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    /// Remote document id (empty for local-only entries)
    #[serde(default)]
    pub id: String,
    pub player_name: String,
    pub score: u32,
    pub level: u32,
    pub time_seconds: u32,
    /// Unix timestamp (ms) when achieved
    pub date: i64,
    /// Install that produced the score
    #[serde(default)]
    pub device_id: String,
}

impl HighScore {
    /// Build an entry from a finished run
    pub fn from_run(player_name: &str, run: &GameStats, device_id: &str) -> Self {
        let name = player_name.trim();
        Self {
            id: String::new(),
            player_name: if name.is_empty() {
                DEFAULT_PLAYER_NAME.to_string()
            } else {
                name.to_string()
            },
            score: run.score,
            level: run.level,
            time_seconds: run.time_seconds,
            date: run.date,
            device_id: device_id.to_string(),
        }
    }

    /// Key used to recognise the same score coming from two sources
    pub fn dedup_key(&self) -> (&str, u32, &str) {
        (&self.player_name, self.score, &self.device_id)
    }

    /// One-line summary, e.g. "Ann  Level 3 • 1m 5s  65 pts"
    pub fn summary(&self) -> String {
        format!(
            "{}  Level {} • {}  {} pts",
            self.player_name,
            self.level,
            format_duration(self.time_seconds),
            self.score
        )
    }
}

/// Local top-10 table, sorted by score descending
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScore>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make it into the table
    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < MAX_LOCAL_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add an entry. Returns the rank achieved (1-indexed) or None if it fell off.
    ///
    /// Equal scores keep their arrival order.
    pub fn add(&mut self, entry: HighScore) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_LOCAL_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}

/// Combine local and remote entries into one leaderboard.
///
/// Entries sharing `(player_name, score, device_id)` are treated as the same
/// score and kept once (local copy wins). This also folds together genuinely
/// repeated identical scores from one device.
pub fn merge_leaderboards(local: &[HighScore], remote: &[HighScore]) -> Vec<HighScore> {
    let mut seen = HashSet::new();
    let mut merged: Vec<HighScore> = local
        .iter()
        .chain(remote.iter())
        .filter(|e| seen.insert(e.dedup_key()))
        .cloned()
        .collect();
    merged.sort_by(|a, b| b.score.cmp(&a.score));
    merged.truncate(MAX_MERGED_SCORES);
    merged
}

/// Format a timestamp as a relative date string
pub fn format_date(timestamp: i64, now: i64) -> String {
    let diff_secs = (now - timestamp).max(0) / 1000;
    let diff_mins = diff_secs / 60;
    let diff_hours = diff_mins / 60;
    let diff_days = diff_hours / 24;

    match (diff_days, diff_hours, diff_mins) {
        (1, _, _) => "Yesterday".to_string(),
        (d, _, _) if d > 1 => format!("{} days ago", d),
        (_, 1, _) => "1 hour ago".to_string(),
        (_, h, _) if h > 1 => format!("{} hours ago", h),
        (_, _, 1) => "1 min ago".to_string(),
        (_, _, m) if m > 1 => format!("{} mins ago", m),
        _ => "Just now".to_string(),
    }
}
