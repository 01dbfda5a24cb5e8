//! Custom error types for saver
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for saver operations
#[derive(Error, Debug)]
pub enum SaverError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    AlreadyExists {
        entity_type: &'static str,
        identifier: String,
    },

    /// Malformed or out-of-bounds save index or range
    #[error("Index out of range: {0}")]
    IndexOutOfRange(String),

    /// An index-addressed operation on a game with an empty history
    #[error("Game \"{0}\" has no saves backed up")]
    NoSaves(String),

    /// A packed directory archive could not be read
    #[error("Corrupt archive: {0}")]
    CorruptArchive(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// HTTP control surface errors
    #[error("Server error: {0}")]
    Server(String),
}

impl SaverError {
    /// Create a "not found" error for games
    pub fn game_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Game",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for a live save file or directory
    pub fn target_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Save target",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for a backup artifact
    pub fn artifact_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup artifact",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a "not found" error for a game
    pub fn is_game_not_found(&self) -> bool {
        matches!(self, Self::NotFound { entity_type: "Game", .. })
    }

    /// Check if this is an "already exists" error
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Check if this is an index/range error
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self, Self::IndexOutOfRange(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for SaverError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SaverError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<zip::result::ZipError> for SaverError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Self::Io(e.to_string()),
            other => Self::CorruptArchive(other.to_string()),
        }
    }
}

/// Result type alias for saver operations
pub type SaverResult<T> = Result<T, SaverError>;
