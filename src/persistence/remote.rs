//! Remote document store
//!
//! Two documents matter: the `high_scores` collection and the single
//! `global_stats` document. Any backend will do as long as it can answer
//! these four calls; callers treat every error as "offline".

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Result, StoreError, read_json, write_json};
use crate::highscores::HighScore;
use crate::now_millis;
use crate::stats::TotalStats;

/// A shared score store reachable from every install
pub trait RemoteStore: Send + Sync {
    /// Append a score to the collection. Returns the new document id.
    fn add_score(&self, entry: &HighScore) -> Result<String>;

    /// Best `limit` scores, highest first
    fn top_scores(&self, limit: usize) -> Result<Vec<HighScore>>;

    /// The global counters document, if it exists yet
    fn global_stats(&self) -> Result<Option<TotalStats>>;

    /// Replace the global counters document
    fn put_global_stats(&self, totals: &TotalStats) -> Result<()>;
}

fn top_of(scores: &[HighScore], limit: usize) -> Vec<HighScore> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));
    sorted.truncate(limit);
    sorted
}

/// Stored form of the global counters
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GlobalDoc {
    #[serde(flatten)]
    totals: TotalStats,
    last_updated: i64,
}

#[derive(Debug, Default)]
struct Collection {
    scores: Vec<HighScore>,
    global: Option<GlobalDoc>,
    next_id: u64,
}

/// In-process store; can be switched offline to exercise fallbacks
#[derive(Debug)]
pub struct MemoryRemote {
    docs: Mutex<Collection>,
    online: AtomicBool,
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self {
            docs: Mutex::new(Collection::default()),
            online: AtomicBool::new(true),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Number of score documents stored
    pub fn score_count(&self) -> usize {
        self.lock().scores.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Collection> {
        self.docs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_online(&self) -> Result<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("network unreachable".to_string()))
        }
    }
}

impl RemoteStore for MemoryRemote {
    fn add_score(&self, entry: &HighScore) -> Result<String> {
        self.check_online()?;
        let mut docs = self.lock();
        docs.next_id += 1;
        let id = format!("doc-{}", docs.next_id);
        docs.scores.push(HighScore {
            id: id.clone(),
            ..entry.clone()
        });
        Ok(id)
    }

    fn top_scores(&self, limit: usize) -> Result<Vec<HighScore>> {
        self.check_online()?;
        Ok(top_of(&self.lock().scores, limit))
    }

    fn global_stats(&self) -> Result<Option<TotalStats>> {
        self.check_online()?;
        Ok(self.lock().global.as_ref().map(|doc| doc.totals))
    }

    fn put_global_stats(&self, totals: &TotalStats) -> Result<()> {
        self.check_online()?;
        self.lock().global = Some(GlobalDoc {
            totals: *totals,
            last_updated: now_millis(),
        });
        Ok(())
    }
}

/// Store kept as JSON documents in a shared directory
#[derive(Debug)]
pub struct DirRemote {
    root: PathBuf,
    // Serialises read-modify-write within this process
    guard: Mutex<()>,
}

impl DirRemote {
    const SCORES: &'static str = "high_scores.json";
    const GLOBAL: &'static str = "global_stats.json";

    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            guard: Mutex::new(()),
        }
    }

    fn check_reachable(&self) -> Result<()> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!(
                "{} is not mounted",
                self.root.display()
            )))
        }
    }

    fn scores(&self) -> Result<Vec<HighScore>> {
        Ok(read_json(&self.root.join(Self::SCORES))?.unwrap_or_default())
    }
}

impl RemoteStore for DirRemote {
    fn add_score(&self, entry: &HighScore) -> Result<String> {
        self.check_reachable()?;
        let _held = self.guard.lock().unwrap_or_else(|p| p.into_inner());
        let mut scores = self.scores()?;
        let id = Uuid::new_v4().to_string();
        scores.push(HighScore {
            id: id.clone(),
            ..entry.clone()
        });
        write_json(&self.root.join(Self::SCORES), &scores)?;
        Ok(id)
    }

    fn top_scores(&self, limit: usize) -> Result<Vec<HighScore>> {
        self.check_reachable()?;
        Ok(top_of(&self.scores()?, limit))
    }

    fn global_stats(&self) -> Result<Option<TotalStats>> {
        self.check_reachable()?;
        let doc: Option<GlobalDoc> = read_json(&self.root.join(Self::GLOBAL))?;
        Ok(doc.map(|d| d.totals))
    }

    fn put_global_stats(&self, totals: &TotalStats) -> Result<()> {
        self.check_reachable()?;
        let _held = self.guard.lock().unwrap_or_else(|p| p.into_inner());
        let doc = GlobalDoc {
            totals: *totals,
            last_updated: now_millis(),
        };
        write_json(&self.root.join(Self::GLOBAL), &doc)
    }
}

/// No remote configured; every call fails as if the network were down
#[derive(Debug, Default, Clone, Copy)]
pub struct Offline;

impl RemoteStore for Offline {
    fn add_score(&self, _entry: &HighScore) -> Result<String> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn top_scores(&self, _limit: usize) -> Result<Vec<HighScore>> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn global_stats(&self) -> Result<Option<TotalStats>> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn put_global_stats(&self, _totals: &TotalStats) -> Result<()> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u32) -> HighScore {
        HighScore {
            id: String::new(),
            player_name: name.to_string(),
            score,
            level: 1,
            time_seconds: score,
            date: 0,
            device_id: "dev".to_string(),
        }
    }

    fn exercise(store: &dyn RemoteStore) {
        assert!(store.global_stats().unwrap().is_none());
        let id = store.add_score(&entry("a", 5)).unwrap();
        assert!(!id.is_empty());
        store.add_score(&entry("b", 50)).unwrap();
        store.add_score(&entry("c", 20)).unwrap();

        let top = store.top_scores(2).unwrap();
        let scores: Vec<u32> = top.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![50, 20]);
        assert!(top.iter().all(|e| !e.id.is_empty()));

        let totals = TotalStats {
            total_games: 3,
            total_time_seconds: 75,
            best_level: 2,
            best_score: 50,
        };
        store.put_global_stats(&totals).unwrap();
        assert_eq!(store.global_stats().unwrap(), Some(totals));
    }

    #[test]
    fn test_memory_remote() {
        exercise(&MemoryRemote::new());
    }

    #[test]
    fn test_dir_remote() {
        let dir = tempfile::tempdir().unwrap();
        exercise(&DirRemote::new(dir.path()));
    }

    #[test]
    fn test_memory_remote_outage() {
        let store = MemoryRemote::new();
        store.set_online(false);
        assert!(matches!(
            store.add_score(&entry("a", 1)),
            Err(StoreError::Unavailable(_))
        ));
        store.set_online(true);
        assert!(store.add_score(&entry("a", 1)).is_ok());
        assert_eq!(store.score_count(), 1);
    }

    #[test]
    fn test_dir_remote_unmounted() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirRemote::new(dir.path().join("missing"));
        assert!(matches!(store.top_scores(5), Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn test_offline_always_fails() {
        assert!(Offline.top_scores(10).is_err());
        assert!(Offline.global_stats().is_err());
    }
}
