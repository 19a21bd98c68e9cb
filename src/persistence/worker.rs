//! Background writer
//!
//! The game loop hands finished-run jobs to a worker thread and moves on.
//! Jobs run in submission order; a failed job is logged and dropped.

use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use super::Result;
use super::service::ScoreService;
use crate::stats::GameStats;

/// Work for the persistence thread
#[derive(Debug, Clone)]
pub enum Job {
    /// Store a high score under a player name
    SaveScore { player_name: String, run: GameStats },
    /// Count a finished run in the lifetime counters
    RecordRun(GameStats),
}

fn run_job(service: &ScoreService, job: Job) {
    let outcome = match &job {
        Job::SaveScore { player_name, run } => {
            service.save_high_score(player_name, run).map(|_| ())
        }
        Job::RecordRun(run) => service.update_totals(run).map(|_| ()),
    };
    if let Err(e) = outcome {
        log::warn!("Persistence job {:?} failed: {}", job, e);
    }
}

/// Handle to the persistence thread
pub struct Persister {
    tx: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl Persister {
    /// Start the worker thread
    pub fn spawn(service: Arc<ScoreService>) -> Result<Self> {
        let (tx, rx) = mpsc::channel::<Job>();
        let handle = thread::Builder::new()
            .name("persister".to_string())
            .spawn(move || {
                for job in rx {
                    run_job(&service, job);
                }
                log::debug!("Persister drained");
            })?;
        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Queue a job without waiting for it
    pub fn submit(&self, job: Job) {
        let sent = self.tx.as_ref().map(|tx| tx.send(job));
        if !matches!(sent, Some(Ok(()))) {
            log::warn!("Persister is not running; job dropped");
        }
    }

    /// Finish queued jobs and stop the thread
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Persister thread panicked");
            }
        }
    }
}

impl Drop for Persister {
    fn drop(&mut self) {
        self.stop();
    }
}
