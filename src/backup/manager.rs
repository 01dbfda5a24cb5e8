//! Backup manager for saver
//!
//! Creates new artifacts for a game's live save and removes ranges of old
//! ones, keeping the game's history and size accounting in step with what is
//! on disk.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use super::target::SaveTarget;
use crate::error::{SaverError, SaverResult};
use crate::models::{artifact_name, Game, Save, SaveRange};

/// How many later timestamps to try when an artifact name is taken
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Outcome of a range delete
///
/// A delete stops at the first artifact that cannot be removed. The saves
/// removed before that point stay removed, and the failure is reported here
/// rather than as an `Err` so the caller can still persist the progress.
#[derive(Debug)]
pub struct DeleteReport {
    /// Saves whose artifacts were removed, in history order
    pub deleted: Vec<Save>,
    /// The error that stopped the delete early, if any
    pub failure: Option<SaverError>,
}

impl DeleteReport {
    /// Number of saves removed
    pub fn count(&self) -> usize {
        self.deleted.len()
    }

    /// Whether every requested save was removed
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Bytes released by the removed artifacts
    pub fn freed_bytes(&self) -> u64 {
        self.deleted.iter().map(|s| s.size).sum()
    }
}

/// Checksum of one save's artifact
#[derive(Debug)]
pub struct ChecksumEntry {
    /// 1-based position in the game's history
    pub id: usize,
    pub save: Save,
    pub checksum: SaverResult<String>,
}

/// Mutates one game's backup history
pub struct BackupManager<'a> {
    game: &'a mut Game,
}

impl<'a> BackupManager<'a> {
    /// Create a new BackupManager for a game
    pub fn new(game: &'a mut Game) -> Self {
        Self { game }
    }

    /// Snapshot the game's live save into a new artifact
    ///
    /// On any failure the partial artifact is removed and the history is left
    /// untouched.
    pub fn backup(&mut self, note: Option<&str>) -> SaverResult<Save> {
        let target = SaveTarget::probe(&self.game.source_path)?;

        fs::create_dir_all(&self.game.archive_root).map_err(|e| {
            SaverError::Io(format!(
                "Failed to create backup directory {}: {}",
                self.game.archive_root.display(),
                e
            ))
        })?;

        let (timestamp, path, artifact) = reserve_artifact(&self.game.archive_root, Utc::now())?;
        debug!(
            "backing up {} {} to {}",
            target,
            self.game.source_path.display(),
            path.display()
        );

        let size = match capture(target, &self.game.source_path, artifact) {
            Ok(size) => size,
            Err(e) => {
                discard_partial(&path);
                return Err(e);
            }
        };

        let save = Save::new(timestamp, path, size).with_note(note.unwrap_or_default());
        self.game.saves.push(save.clone());
        self.game.total_size += size;
        self.game.touch();

        info!(game = %self.game.name, size, "backed up {}", save.archive_path.display());
        Ok(save)
    }

    /// Delete the saves in an inclusive 1-based range
    ///
    /// Bounds are checked before anything is touched. Artifacts are removed in
    /// ascending order; the first failure stops the loop and is returned in
    /// the report alongside the saves that were already removed.
    pub fn delete(&mut self, range: SaveRange) -> SaverResult<DeleteReport> {
        let len = self.game.saves.len();
        if range.from < 1 {
            return Err(SaverError::IndexOutOfRange(format!(
                "Index from {} out of range",
                range.from
            )));
        }
        if range.to > len as i64 {
            return Err(SaverError::IndexOutOfRange(format!(
                "Index to {} out of range (1 ~ {})",
                range.to, len
            )));
        }
        if range.from > range.to {
            return Err(SaverError::IndexOutOfRange(format!(
                "Range {}-{} is inverted",
                range.from, range.to
            )));
        }

        let start = (range.from - 1) as usize;
        let end = range.to as usize;

        let mut deleted = Vec::new();
        let mut failure = None;
        for (offset, save) in self.game.saves[start..end].iter().enumerate() {
            debug!(
                "removing save {} from {}",
                start + offset + 1,
                save.timestamp.format("%Y-%m-%d %H:%M:%S")
            );
            match remove_artifact(&save.archive_path) {
                Ok(()) => deleted.push(save.clone()),
                Err(e) => {
                    warn!("stopping delete at save {}: {}", start + offset + 1, e);
                    failure = Some(e);
                    break;
                }
            }
        }

        self.game.saves.drain(start..start + deleted.len());

        let report = DeleteReport { deleted, failure };
        self.game.total_size = self.game.total_size.saturating_sub(report.freed_bytes());

        info!(game = %self.game.name, count = report.count(), "deleted saves");
        Ok(report)
    }
}

/// Checksum every save of a game, oldest first
///
/// A failure to read one artifact is recorded for that entry only.
pub fn checksum_all(game: &Game) -> Vec<ChecksumEntry> {
    game.saves
        .iter()
        .enumerate()
        .map(|(i, save)| ChecksumEntry {
            id: i + 1,
            save: save.clone(),
            checksum: save.checksum(),
        })
        .collect()
}

/// Create a new, empty artifact file with a unique timestamped name
///
/// A name already taken moves the timestamp forward by a millisecond, so
/// names stay unique and in creation order.
fn reserve_artifact(
    root: &Path,
    mut timestamp: DateTime<Utc>,
) -> SaverResult<(DateTime<Utc>, PathBuf, File)> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let path = root.join(artifact_name(&timestamp));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((timestamp, path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                timestamp += Duration::milliseconds(1);
            }
            Err(e) => {
                return Err(SaverError::Io(format!(
                    "Failed to create {}: {}",
                    path.display(),
                    e
                )))
            }
        }
    }

    Err(SaverError::AlreadyExists {
        entity_type: "Backup artifact",
        identifier: root.join(artifact_name(&timestamp)).display().to_string(),
    })
}

fn capture(target: SaveTarget, source: &Path, artifact: File) -> SaverResult<u64> {
    let artifact = target.capture(source, artifact)?;
    let metadata = artifact
        .metadata()
        .map_err(|e| SaverError::Io(format!("Failed to stat new artifact: {}", e)))?;
    Ok(metadata.len())
}

fn discard_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("Error removing partial backup file {}: {}", path.display(), e);
    }
}

/// Remove one artifact; one that is already gone counts as removed
fn remove_artifact(path: &Path) -> SaverResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("artifact {} was already missing", path.display());
            Ok(())
        }
        Err(e) => Err(SaverError::Io(format!(
            "Failed to remove {}: {}",
            path.display(),
            e
        ))),
    }
}
