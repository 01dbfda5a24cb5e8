//! Save model
//!
//! A single point-in-time backup of a game's save location.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{SaverError, SaverResult};

/// Artifact file name layout: `YYYY-MM-DD_HHMMSS-mmm`
const ARTIFACT_NAME_FORMAT: &str = "%Y-%m-%d_%H%M%S";

/// One backup artifact plus its metadata
///
/// Field names on disk match the registry format written by earlier
/// versions of the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Save {
    /// When the backup was taken; also encoded in the artifact name
    #[serde(rename = "Stamp")]
    pub timestamp: DateTime<Utc>,

    /// Absolute path to the artifact
    #[serde(rename = "Path")]
    pub archive_path: PathBuf,

    /// Optional user note
    #[serde(rename = "Note", default)]
    pub note: String,

    /// Artifact size in bytes at creation time (0 on entries that predate
    /// format version 1)
    #[serde(rename = "Size", default)]
    pub size: u64,
}

impl Save {
    /// Create a new save entry with an empty note
    pub fn new(timestamp: DateTime<Utc>, archive_path: PathBuf, size: u64) -> Self {
        Self {
            timestamp,
            archive_path,
            note: String::new(),
            size,
        }
    }

    /// Set the note, builder style
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Whether a note has been attached
    pub fn has_note(&self) -> bool {
        !self.note.is_empty()
    }

    /// Compute the SHA-256 of the artifact as lowercase hex
    pub fn checksum(&self) -> SaverResult<String> {
        checksum_file(&self.archive_path)
    }
}

/// Derive the artifact file name for a timestamp
///
/// Names sort lexically in creation order.
pub fn artifact_name(timestamp: &DateTime<Utc>) -> String {
    format!(
        "{}-{:03}",
        timestamp.format(ARTIFACT_NAME_FORMAT),
        timestamp.timestamp_subsec_millis()
    )
}

/// Stream a file through SHA-256
pub fn checksum_file(path: &Path) -> SaverResult<String> {
    let mut file = File::open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            SaverError::artifact_not_found(path.display().to_string())
        } else {
            SaverError::Io(format!("Failed to open {}: {}", path.display(), e))
        }
    })?;

    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .map_err(|e| SaverError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    Ok(format!("{:x}", hasher.finalize()))
}
