//! Per-run results and lifetime counters

use serde::{Deserialize, Serialize};

use crate::now_millis;

/// Outcome of a single run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    /// Seconds survived (score ticks / tick rate)
    pub score: u32,
    /// Level reached
    pub level: u32,
    /// Run duration in seconds
    pub time_seconds: u32,
    /// Unix timestamp (ms) when the run ended
    pub date: i64,
}

impl GameStats {
    pub fn new(score: u32, level: u32, time_seconds: u32) -> Self {
        Self {
            score,
            level,
            time_seconds,
            date: now_millis(),
        }
    }
}

/// Lifetime counters across all runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalStats {
    pub total_games: u32,
    pub total_time_seconds: u32,
    pub best_level: u32,
    pub best_score: u32,
}

impl Default for TotalStats {
    fn default() -> Self {
        Self {
            total_games: 0,
            total_time_seconds: 0,
            best_level: 1,
            best_score: 0,
        }
    }
}

impl TotalStats {
    /// Counters after one more finished run
    pub fn record(&self, run: &GameStats) -> Self {
        Self {
            total_games: self.total_games.saturating_add(1),
            total_time_seconds: self.total_time_seconds.saturating_add(run.time_seconds),
            best_level: self.best_level.max(run.level),
            best_score: self.best_score.max(run.score),
        }
    }

    /// Reconcile two copies of the counters by taking the larger of each field.
    ///
    /// Counters only ever grow, so the larger value is the more complete one.
    pub fn merge(local: &Self, remote: &Self) -> Self {
        Self {
            total_games: local.total_games.max(remote.total_games),
            total_time_seconds: local.total_time_seconds.max(remote.total_time_seconds),
            best_level: local.best_level.max(remote.best_level),
            best_score: local.best_score.max(remote.best_score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(score: u32, level: u32, time_seconds: u32) -> GameStats {
        GameStats {
            score,
            level,
            time_seconds,
            date: 0,
        }
    }

    #[test]
    fn test_record_accumulates() {
        let totals = TotalStats::default()
            .record(&run(30, 2, 31))
            .record(&run(10, 1, 12));
        assert_eq!(totals.total_games, 2);
        assert_eq!(totals.total_time_seconds, 43);
        assert_eq!(totals.best_level, 2);
        assert_eq!(totals.best_score, 30);
    }

    #[test]
    fn test_merge_takes_max_per_field() {
        let local = TotalStats {
            total_games: 5,
            total_time_seconds: 100,
            best_level: 3,
            best_score: 70,
        };
        let remote = TotalStats {
            total_games: 40,
            total_time_seconds: 90,
            best_level: 6,
            best_score: 12,
        };
        let merged = TotalStats::merge(&local, &remote);
        assert_eq!(
            merged,
            TotalStats {
                total_games: 40,
                total_time_seconds: 100,
                best_level: 6,
                best_score: 70,
            }
        );
    }

    fn arb_totals() -> impl Strategy<Value = TotalStats> {
        (any::<u32>(), any::<u32>(), 1u32..1000, any::<u32>()).prop_map(|(g, t, l, s)| {
            TotalStats {
                total_games: g,
                total_time_seconds: t,
                best_level: l,
                best_score: s,
            }
        })
    }

    proptest! {
        #[test]
        fn merge_is_commutative(a in arb_totals(), b in arb_totals()) {
            prop_assert_eq!(TotalStats::merge(&a, &b), TotalStats::merge(&b, &a));
        }

        #[test]
        fn merge_is_idempotent(a in arb_totals()) {
            prop_assert_eq!(TotalStats::merge(&a, &a), a);
        }
    }
}
