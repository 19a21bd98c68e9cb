//! Local table of every saved result
//!
//! Rows get an auto-incrementing id. Queries mirror what the leaderboard and
//! player screens need: top N, all rows for one player, max and mean score.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Result, read_json, write_json};
use crate::highscores::HighScore;

const RECORDS_FILE: &str = "game_records.json";

/// One stored result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: i64,
    pub player_name: String,
    pub score: u32,
    pub level: u32,
    pub time_seconds: u32,
    /// Unix timestamp (ms)
    pub date: i64,
}

impl From<&GameRecord> for HighScore {
    fn from(record: &GameRecord) -> Self {
        HighScore {
            id: record.id.to_string(),
            player_name: record.player_name.clone(),
            score: record.score,
            level: record.level,
            time_seconds: record.time_seconds,
            date: record.date,
            device_id: String::new(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Table {
    next_id: i64,
    rows: Vec<GameRecord>,
}

/// File-backed record table
#[derive(Debug)]
pub struct RecordTable {
    path: PathBuf,
    table: Table,
}

impl RecordTable {
    /// Open the table in `dir`. An unreadable file is discarded, like a
    /// destructive schema migration.
    pub fn open(dir: &Path) -> Self {
        let path = dir.join(RECORDS_FILE);
        let table = match read_json::<Table>(&path) {
            Ok(Some(table)) => table,
            Ok(None) => Table::default(),
            Err(e) => {
                log::warn!("Dropping unreadable record table {}: {}", path.display(), e);
                Table::default()
            }
        };
        Self { path, table }
    }

    /// Insert a result and return its row id
    pub fn insert(
        &mut self,
        player_name: &str,
        score: u32,
        level: u32,
        time_seconds: u32,
        date: i64,
    ) -> Result<i64> {
        self.table.next_id += 1;
        let id = self.table.next_id;
        self.table.rows.push(GameRecord {
            id,
            player_name: player_name.to_string(),
            score,
            level,
            time_seconds,
            date,
        });
        if let Err(e) = write_json(&self.path, &self.table) {
            self.table.rows.pop();
            self.table.next_id -= 1;
            return Err(e);
        }
        Ok(id)
    }

    /// Every row, best score first
    pub fn all(&self) -> Vec<GameRecord> {
        let mut rows = self.table.rows.clone();
        rows.sort_by(|a, b| b.score.cmp(&a.score).then(b.date.cmp(&a.date)));
        rows
    }

    /// The `limit` best rows
    pub fn top(&self, limit: usize) -> Vec<GameRecord> {
        let mut rows = self.all();
        rows.truncate(limit);
        rows
    }

    /// Rows for one player, best score first
    pub fn by_player(&self, player_name: &str) -> Vec<GameRecord> {
        self.all()
            .into_iter()
            .filter(|r| r.player_name == player_name)
            .collect()
    }

    pub fn max_score(&self) -> Option<u32> {
        self.table.rows.iter().map(|r| r.score).max()
    }

    pub fn average_score(&self) -> Option<f32> {
        if self.table.rows.is_empty() {
            return None;
        }
        let sum: u64 = self.table.rows.iter().map(|r| r.score as u64).sum();
        Some(sum as f32 / self.table.rows.len() as f32)
    }

    pub fn len(&self) -> usize {
        self.table.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.rows.is_empty()
    }

    /// Delete every row. Ids keep counting up.
    pub fn clear(&mut self) -> Result<()> {
        self.table.rows.clear();
        write_json(&self.path, &self.table)
    }
}
