//! Storage layer for saver
//!
//! The registry is a single JSON file. A `Storage` session loads it once,
//! hands out the in-memory registry for one command (or one HTTP request), and
//! writes it back atomically only if something changed.

pub mod file_io;
pub mod migrate;
pub mod registry;

pub use file_io::{read_json_optional, write_json_atomic};
pub use migrate::{MigrationReport, CURRENT_FORMAT_VERSION};
pub use registry::Registry;

use tracing::debug;

use crate::config::paths::SaverPaths;
use crate::error::SaverError;

/// A loaded registry plus where it goes back to
pub struct Storage {
    paths: SaverPaths,
    registry: Registry,
    dirty: bool,
    fresh: bool,
}

impl Storage {
    /// Load the registry, or start a fresh one next to the config file
    ///
    /// A fresh registry is marked dirty so it gets written at the end of the
    /// session.
    pub fn open(paths: SaverPaths) -> Result<Self, SaverError> {
        match Registry::load(paths.config_file())? {
            Some(registry) => Ok(Self {
                paths,
                registry,
                dirty: false,
                fresh: false,
            }),
            None => {
                debug!("no config at {}, starting fresh", paths.config_file().display());
                Ok(Self {
                    registry: Registry::new(paths.default_root()),
                    paths,
                    dirty: true,
                    fresh: true,
                })
            }
        }
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &SaverPaths {
        &self.paths
    }

    /// Whether the registry was created in this session
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access; callers decide whether to `mark_dirty`
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Record that the registry must be written back
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the registry if anything changed; returns whether it wrote
    pub fn save_if_dirty(&mut self) -> Result<bool, SaverError> {
        if !self.dirty {
            return Ok(false);
        }

        self.registry.save(self.paths.config_file())?;
        self.dirty = false;
        self.fresh = false;
        Ok(true)
    }
}
