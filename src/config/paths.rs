//! Path management for saver
//!
//! ## Path Resolution Order
//!
//! 1. `--config <FILE>` on the command line
//! 2. `SAVER_CONFIG` environment variable (handled by clap)
//! 3. `saver.json` in the current directory
//!
//! Relative paths are resolved against the current directory. A fresh
//! registry stores its game directories next to the config file.

use std::path::{Path, PathBuf};

use crate::error::SaverError;

/// Default registry file name
pub const DEFAULT_CONFIG_FILE: &str = "saver.json";

/// Manages all paths used by saver
#[derive(Debug, Clone)]
pub struct SaverPaths {
    /// Absolute path of the persisted registry
    config_file: PathBuf,
}

impl SaverPaths {
    /// Resolve paths from a (possibly relative) config file location
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty or the current directory cannot
    /// be determined.
    pub fn new(config_file: impl AsRef<Path>) -> Result<Self, SaverError> {
        let config_file = config_file.as_ref();
        if config_file.as_os_str().is_empty() {
            return Err(SaverError::Config(
                "Config file path can't be empty".into(),
            ));
        }

        Ok(Self {
            config_file: absolutize(config_file)?,
        })
    }

    /// Get the path to the registry file
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Get the archive root used for a freshly created registry
    pub fn default_root(&self) -> PathBuf {
        self.config_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Check if a registry has been persisted yet
    pub fn is_initialized(&self) -> bool {
        self.config_file.exists()
    }
}

/// Resolve a path against the current directory without touching the filesystem
pub fn absolutize(path: &Path) -> Result<PathBuf, SaverError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let cwd = std::env::current_dir()
        .map_err(|e| SaverError::Config(format!("Can't get current path: {}", e)))?;
    Ok(cwd.join(path))
}
