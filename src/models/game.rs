//! Game model
//!
//! A tracked save target (file or directory) plus its ordered backup history.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::save::Save;
use crate::error::{SaverError, SaverResult};

/// A game whose save location is protected by backups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Unique mnemonic, also the name of the archive directory
    #[serde(rename = "Name")]
    pub name: String,

    /// Absolute path to the live save file or directory
    #[serde(rename = "Path")]
    pub source_path: PathBuf,

    /// Absolute path to the directory holding this game's artifacts
    #[serde(rename = "Root")]
    pub archive_root: PathBuf,

    /// Last backup or restore affecting this game
    #[serde(rename = "Stamp")]
    pub last_modified: DateTime<Utc>,

    /// Saves in creation order, oldest first
    #[serde(rename = "Saves", default)]
    pub saves: Vec<Save>,

    /// Sum of all saves' recorded sizes
    #[serde(rename = "Size", default)]
    pub total_size: u64,
}

/// Where a game's files live, for the `info` view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameInfo {
    pub source_path: PathBuf,
    pub archive_root: PathBuf,
    pub latest_save: Option<PathBuf>,
}

impl Game {
    /// Create a game with an empty history
    pub fn new(
        name: impl Into<String>,
        source_path: impl Into<PathBuf>,
        archive_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            source_path: source_path.into(),
            archive_root: archive_root.into(),
            last_modified: Utc::now(),
            saves: Vec::new(),
            total_size: 0,
        }
    }

    /// Validate a game name
    ///
    /// Names become directory names under the registry root, so they must be
    /// a single normal path component.
    pub fn validate_name(name: &str) -> SaverResult<()> {
        if name.trim().is_empty() {
            return Err(SaverError::Validation("Game name cannot be empty".into()));
        }
        if name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(SaverError::Validation(format!(
                "Game name '{}' must not contain path separators",
                name
            )));
        }
        Ok(())
    }

    /// Number of saves
    pub fn len(&self) -> usize {
        self.saves.len()
    }

    /// Whether the game has no saves yet
    pub fn is_empty(&self) -> bool {
        self.saves.is_empty()
    }

    /// The newest save, if any
    pub fn latest(&self) -> Option<&Save> {
        self.saves.last()
    }

    /// The oldest save, if any
    pub fn oldest(&self) -> Option<&Save> {
        self.saves.first()
    }

    /// Record that a backup or restore just happened
    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }

    /// Recompute the total from the live entries
    pub fn recorded_size(&self) -> u64 {
        self.saves.iter().map(|s| s.size).sum()
    }

    /// Paths for the info view
    pub fn info(&self) -> GameInfo {
        GameInfo {
            source_path: self.source_path.clone(),
            archive_root: self.archive_root.clone(),
            latest_save: self.latest().map(|s| s.archive_path.clone()),
        }
    }
}
