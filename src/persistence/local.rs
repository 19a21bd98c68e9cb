//! Local preferences file
//!
//! One JSON document per install holding the device id, the local top-10
//! table and the lifetime counters. Every mutation is written through.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Result, read_json, write_json};
use crate::highscores::{HighScore, HighScores};
use crate::stats::{GameStats, TotalStats};

const PREFS_FILE: &str = "game_stats.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Prefs {
    #[serde(default)]
    device_id: String,
    #[serde(default)]
    high_scores: HighScores,
    #[serde(default)]
    totals: TotalStats,
}

/// File-backed key-value preferences
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    prefs: Prefs,
}

impl LocalStore {
    /// Open (or start) the preferences file in `dir`.
    ///
    /// A corrupt file is logged and replaced by fresh defaults.
    pub fn open(dir: &Path) -> Self {
        let path = dir.join(PREFS_FILE);
        let prefs = match read_json::<Prefs>(&path) {
            Ok(Some(prefs)) => {
                log::info!("Loaded {} local high scores", prefs.high_scores.entries.len());
                prefs
            }
            Ok(None) => {
                log::info!("No local stats found, starting fresh");
                Prefs::default()
            }
            Err(e) => {
                log::warn!("Discarding unreadable {}: {}", path.display(), e);
                Prefs::default()
            }
        };
        Self { path, prefs }
    }

    fn save(&self) -> Result<()> {
        write_json(&self.path, &self.prefs)
    }

    /// This install's id, generated and stored on first use
    pub fn device_id(&mut self) -> Result<String> {
        if self.prefs.device_id.is_empty() {
            self.prefs.device_id = Uuid::new_v4().to_string();
            self.save()?;
            log::info!("Generated device id {}", self.prefs.device_id);
        }
        Ok(self.prefs.device_id.clone())
    }

    /// Local top-10 table
    pub fn high_scores(&self) -> &HighScores {
        &self.prefs.high_scores
    }

    /// Add an entry to the local table. Returns its rank if it made the cut.
    pub fn add_high_score(&mut self, entry: HighScore) -> Result<Option<usize>> {
        let rank = self.prefs.high_scores.add(entry);
        self.save()?;
        Ok(rank)
    }

    /// Lifetime counters as stored locally
    pub fn totals(&self) -> TotalStats {
        self.prefs.totals
    }

    /// Count one finished run
    pub fn record_run(&mut self, run: &GameStats) -> Result<TotalStats> {
        self.prefs.totals = self.prefs.totals.record(run);
        self.save()?;
        Ok(self.prefs.totals)
    }

    /// Overwrite the counters (after reconciling with the remote copy)
    pub fn set_totals(&mut self, totals: TotalStats) -> Result<()> {
        if self.prefs.totals != totals {
            self.prefs.totals = totals;
            self.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(score: u32, level: u32) -> GameStats {
        GameStats {
            score,
            level,
            time_seconds: score,
            date: 0,
        }
    }

    #[test]
    fn test_device_id_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let first = LocalStore::open(dir.path()).device_id().unwrap();
        let again = LocalStore::open(dir.path()).device_id().unwrap();
        assert_eq!(first, again);
        assert!(Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn test_counters_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = LocalStore::open(dir.path());
            assert_eq!(store.totals(), TotalStats::default());
            store.record_run(&run(20, 2)).unwrap();
            store.record_run(&run(5, 1)).unwrap();
        }
        let store = LocalStore::open(dir.path());
        let totals = store.totals();
        assert_eq!(totals.total_games, 2);
        assert_eq!(totals.total_time_seconds, 25);
        assert_eq!(totals.best_level, 2);
        assert_eq!(totals.best_score, 20);
    }

    #[test]
    fn test_high_scores_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = LocalStore::open(dir.path());
            let entry = HighScore::from_run("ann", &run(30, 2), "dev");
            assert_eq!(store.add_high_score(entry).unwrap(), Some(1));
        }
        let store = LocalStore::open(dir.path());
        assert_eq!(store.high_scores().top_score(), Some(30));
    }

    #[test]
    fn test_corrupt_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PREFS_FILE), "garbage").unwrap();
        let store = LocalStore::open(dir.path());
        assert!(store.high_scores().is_empty());
        assert_eq!(store.totals(), TotalStats::default());
    }
}
