//! Game settings and preferences
//!
//! Persisted as a JSON file next to the score data. Missing or unreadable
//! files fall back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::highscores::DEFAULT_PLAYER_NAME;
use crate::persistence::{self, read_json, write_json};
use crate::sim::Field;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "DODGE_ARENA_DATA";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name written with saved scores
    pub player_name: String,
    /// Where local stores live
    pub data_dir: PathBuf,
    /// Shared directory acting as the remote store (None = offline)
    pub remote_dir: Option<PathBuf>,

    // === Play field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Simulation ===
    /// Fixed seed for reproducible runs (None = random per run)
    pub seed: Option<u64>,
    /// Pace headless runs at the nominal frame interval
    pub realtime: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            data_dir: default_data_dir(),
            remote_dir: None,

            field_width: DEFAULT_FIELD_WIDTH,
            field_height: DEFAULT_FIELD_HEIGHT,

            seed: None,
            realtime: false,
        }
    }
}

/// `$DODGE_ARENA_DATA`, else `.dodge-arena` in the working directory
pub fn default_data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".dodge-arena"))
}

impl Settings {
    /// File name used inside the data directory
    pub const FILE_NAME: &'static str = "settings.json";

    /// Play field described by these settings, with degenerate sizes replaced
    pub fn field(&self) -> Field {
        let width = if self.field_width > 0.0 {
            self.field_width
        } else {
            DEFAULT_FIELD_WIDTH
        };
        let height = if self.field_height > 0.0 {
            self.field_height
        } else {
            DEFAULT_FIELD_HEIGHT
        };
        Field::new(width, height)
    }

    /// Name to save a run under: the explicit one, else the configured one
    pub fn score_name(&self, name: Option<String>) -> String {
        name.filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.player_name.clone())
    }

    /// Default settings location
    pub fn default_path() -> PathBuf {
        default_data_dir().join(Self::FILE_NAME)
    }

    /// Load settings from `path`
    pub fn load(path: &Path) -> Self {
        match read_json::<Settings>(path) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to `path`
    pub fn save(&self, path: &Path) -> persistence::Result<()> {
        write_json(path, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
