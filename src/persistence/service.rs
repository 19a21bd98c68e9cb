//! Score service
//!
//! Local storage is authoritative for this install; the remote store is
//! consulted opportunistically. Remote failures are logged and the local
//! answer is returned. Nothing is retried.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::Result;
use super::local::LocalStore;
use super::records::{GameRecord, RecordTable};
use super::remote::RemoteStore;
use crate::highscores::{HighScore, MAX_MERGED_SCORES, merge_leaderboards};
use crate::stats::{GameStats, TotalStats};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Local + remote score storage
pub struct ScoreService {
    local: Mutex<LocalStore>,
    records: Mutex<RecordTable>,
    remote: Box<dyn RemoteStore>,
}

impl ScoreService {
    /// Open local storage under `data_dir`
    pub fn open(data_dir: &Path, remote: Box<dyn RemoteStore>) -> Self {
        Self {
            local: Mutex::new(LocalStore::open(data_dir)),
            records: Mutex::new(RecordTable::open(data_dir)),
            remote,
        }
    }

    /// This install's device id
    pub fn device_id(&self) -> Result<String> {
        lock(&self.local).device_id()
    }

    /// Save a finished run under `player_name`.
    ///
    /// Always written locally; the remote copy is best-effort.
    pub fn save_high_score(&self, player_name: &str, run: &GameStats) -> Result<HighScore> {
        let mut entry = {
            let mut local = lock(&self.local);
            let device_id = local.device_id()?;
            let entry = HighScore::from_run(player_name, run, &device_id);
            local.add_high_score(entry.clone())?;
            entry
        };

        let row = lock(&self.records).insert(
            &entry.player_name,
            entry.score,
            entry.level,
            entry.time_seconds,
            entry.date,
        );
        match row {
            Ok(row) => log::info!(
                "Saved score {} for {} (row {})",
                entry.score,
                entry.player_name,
                row
            ),
            Err(e) => log::warn!("Record table write skipped: {}", e),
        }

        match self.remote.add_score(&entry) {
            Ok(id) => entry.id = id,
            Err(e) => log::warn!("Remote save skipped, kept locally: {}", e),
        }
        Ok(entry)
    }

    /// Leaderboard: local table merged with the remote top scores
    pub fn high_scores(&self) -> Vec<HighScore> {
        let local = lock(&self.local).high_scores().entries.clone();
        match self.remote.top_scores(MAX_MERGED_SCORES) {
            Ok(remote) => merge_leaderboards(&local, &remote),
            Err(e) => {
                log::warn!("Remote leaderboard unavailable, showing local: {}", e);
                local
            }
        }
    }

    /// Count a finished run in the local and remote counters
    pub fn update_totals(&self, run: &GameStats) -> Result<TotalStats> {
        let totals = lock(&self.local).record_run(run)?;

        let remote = self
            .remote
            .global_stats()
            .map(|current| current.unwrap_or_default().record(run))
            .and_then(|updated| self.remote.put_global_stats(&updated));
        if let Err(e) = remote {
            log::warn!("Remote stats update skipped: {}", e);
        }

        Ok(totals)
    }

    /// Lifetime counters, reconciled with the remote copy when reachable.
    ///
    /// A larger remote value is written back locally.
    pub fn totals(&self) -> TotalStats {
        let mut local = lock(&self.local);
        let local_totals = local.totals();

        let remote_totals = match self.remote.global_stats() {
            Ok(Some(remote)) => remote,
            Ok(None) => return local_totals,
            Err(e) => {
                log::warn!("Remote stats unavailable, using local: {}", e);
                return local_totals;
            }
        };

        let merged = TotalStats::merge(&local_totals, &remote_totals);
        if let Err(e) = local.set_totals(merged) {
            log::warn!("Could not cache reconciled stats: {}", e);
        }
        merged
    }

    /// Rank a score would take in the local top-10 (1-based), if any
    pub fn local_rank(&self, score: u32) -> Option<usize> {
        lock(&self.local).high_scores().potential_rank(score)
    }

    /// The `limit` best saved results across all players
    pub fn top_records(&self, limit: usize) -> Vec<HighScore> {
        lock(&self.records)
            .top(limit)
            .iter()
            .map(HighScore::from)
            .collect()
    }

    /// All saved results for one player, best first
    pub fn player_records(&self, player_name: &str) -> Vec<GameRecord> {
        lock(&self.records).by_player(player_name)
    }

    /// Best and mean score across every saved result
    pub fn score_summary(&self) -> (Option<u32>, Option<f32>) {
        let records = lock(&self.records);
        (records.max_score(), records.average_score())
    }

    /// Drop every saved result (the top-10 table and counters are kept)
    pub fn clear_records(&self) -> Result<()> {
        lock(&self.records).clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::remote::{MemoryRemote, Offline};
    use std::sync::Arc;

    /// Lets a test keep a handle on the remote the service owns
    struct Shared(Arc<MemoryRemote>);

    impl RemoteStore for Shared {
        fn add_score(&self, entry: &HighScore) -> Result<String> {
            self.0.add_score(entry)
        }
        fn top_scores(&self, limit: usize) -> Result<Vec<HighScore>> {
            self.0.top_scores(limit)
        }
        fn global_stats(&self) -> Result<Option<TotalStats>> {
            self.0.global_stats()
        }
        fn put_global_stats(&self, totals: &TotalStats) -> Result<()> {
            self.0.put_global_stats(totals)
        }
    }

    fn run(score: u32, level: u32) -> GameStats {
        GameStats {
            score,
            level,
            time_seconds: score + 1,
            date: 1_000,
        }
    }

    fn service_with_remote(dir: &Path) -> (ScoreService, Arc<MemoryRemote>) {
        let remote = Arc::new(MemoryRemote::new());
        let service = ScoreService::open(dir, Box::new(Shared(remote.clone())));
        (service, remote)
    }

    #[test]
    fn test_save_goes_everywhere() {
        let dir = tempfile::tempdir().unwrap();
        let (service, remote) = service_with_remote(dir.path());

        let saved = service.save_high_score("ann", &run(42, 3)).unwrap();
        assert!(saved.id.starts_with("doc-"));
        assert_eq!(saved.device_id, service.device_id().unwrap());
        assert_eq!(remote.score_count(), 1);
        assert_eq!(service.player_records("ann").len(), 1);

        // Same score from both sides appears once
        let board = service.high_scores();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].score, 42);
    }

    #[test]
    fn test_save_offline_keeps_local() {
        let dir = tempfile::tempdir().unwrap();
        let service = ScoreService::open(dir.path(), Box::new(Offline));

        let saved = service.save_high_score("bob", &run(7, 1)).unwrap();
        assert!(saved.id.is_empty());
        let board = service.high_scores();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].player_name, "bob");
    }

    #[test]
    fn test_leaderboard_merges_other_devices() {
        let dir = tempfile::tempdir().unwrap();
        let (service, remote) = service_with_remote(dir.path());
        service.save_high_score("ann", &run(10, 1)).unwrap();

        let other = HighScore::from_run("zed", &run(99, 5), "other-device");
        remote.add_score(&other).unwrap();

        let board = service.high_scores();
        let names: Vec<&str> = board.iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["zed", "ann"]);

        remote.set_online(false);
        let board = service.high_scores();
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_totals_update_both_copies() {
        let dir = tempfile::tempdir().unwrap();
        let (service, remote) = service_with_remote(dir.path());

        service.update_totals(&run(30, 2)).unwrap();
        service.update_totals(&run(10, 1)).unwrap();

        let remote_totals = remote.global_stats().unwrap().unwrap();
        assert_eq!(remote_totals.total_games, 2);
        assert_eq!(remote_totals.best_score, 30);

        let totals = service.totals();
        assert_eq!(totals.total_games, 2);
        assert_eq!(totals.total_time_seconds, 42);
        assert_eq!(totals.best_level, 2);
    }

    #[test]
    fn test_totals_reconciled_at_read_time() {
        let dir = tempfile::tempdir().unwrap();
        let (service, remote) = service_with_remote(dir.path());

        remote.set_online(false);
        service.update_totals(&run(15, 2)).unwrap();
        remote.set_online(true);

        remote
            .put_global_stats(&TotalStats {
                total_games: 100,
                total_time_seconds: 5,
                best_level: 9,
                best_score: 3,
            })
            .unwrap();

        let merged = service.totals();
        assert_eq!(
            merged,
            TotalStats {
                total_games: 100,
                total_time_seconds: 16,
                best_level: 9,
                best_score: 15,
            }
        );

        // The reconciled values were cached locally
        remote.set_online(false);
        assert_eq!(service.totals(), merged);
    }

    #[test]
    fn test_score_summary_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let service = ScoreService::open(dir.path(), Box::new(Offline));
        service.save_high_score("a", &run(10, 1)).unwrap();
        service.save_high_score("b", &run(30, 2)).unwrap();

        let (max, avg) = service.score_summary();
        assert_eq!(max, Some(30));
        assert!((avg.unwrap() - 20.0).abs() < 1e-5);

        service.clear_records().unwrap();
        assert_eq!(service.score_summary(), (None, None));
        // The top-10 table is separate
        assert_eq!(service.high_scores().len(), 2);
    }

    #[test]
    fn test_top_records_and_local_rank() {
        let dir = tempfile::tempdir().unwrap();
        let service = ScoreService::open(dir.path(), Box::new(Offline));
        assert_eq!(service.local_rank(1), Some(1));

        for (name, score) in [("a", 10), ("b", 30), ("c", 20)] {
            service.save_high_score(name, &run(score, 1)).unwrap();
        }

        let top = service.top_records(2);
        let scores: Vec<u32> = top.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![30, 20]);
        assert_eq!(top[0].player_name, "b");
        assert_eq!(top[0].id, "2");

        assert_eq!(service.local_rank(25), Some(2));
        assert_eq!(service.local_rank(5), Some(4));
    }

    #[test]
    fn test_record_table_failure_keeps_top_ten() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the record table file should be makes its writes fail
        let blocked = dir.path().join("game_records.json");
        std::fs::create_dir(&blocked).unwrap();
        std::fs::write(blocked.join("keep"), b"x").unwrap();

        let (service, remote) = service_with_remote(dir.path());
        let saved = service.save_high_score("ann", &run(12, 1)).unwrap();

        assert!(saved.id.starts_with("doc-"));
        assert_eq!(remote.score_count(), 1);
        assert!(service.player_records("ann").is_empty());
        assert_eq!(service.high_scores().len(), 1);
    }
}
