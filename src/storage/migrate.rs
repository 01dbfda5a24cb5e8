//! Registry format migrations
//!
//! Each format version bump has one upgrade step. Steps only run when the
//! loaded registry is older than the step, so `migrate` can be run any number
//! of times.

use std::fs;

use tracing::debug;

use super::registry::Registry;
use crate::error::{SaverError, SaverResult};

/// Version 1 added recorded artifact sizes to saves and games
pub const FORMAT_VERSION_SIZES: u32 = 1;

/// Version written by this build
pub const CURRENT_FORMAT_VERSION: u32 = FORMAT_VERSION_SIZES;

/// What a migration run changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Versions that were stepped through, in order
    pub applied: Vec<u32>,
    /// Saves whose size was backfilled
    pub sizes_backfilled: usize,
}

impl MigrationReport {
    /// Whether anything was changed
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

impl Registry {
    /// Upgrade the registry to the current format version
    ///
    /// `progress` is called once per game and once per save visited so a
    /// caller can drive a spinner. An artifact that cannot be stat'ed aborts
    /// the migration and leaves the version unchanged.
    pub fn migrate(&mut self, mut progress: impl FnMut(&str)) -> SaverResult<MigrationReport> {
        let mut report = MigrationReport::default();

        if self.format_version < FORMAT_VERSION_SIZES {
            progress(&format!("Migrating -> {}", FORMAT_VERSION_SIZES));
            for game in &mut self.games {
                progress(&game.name);
                for save in &mut game.saves {
                    progress(&game.name);
                    if save.size > 0 {
                        continue;
                    }

                    let metadata = fs::metadata(&save.archive_path).map_err(|e| {
                        SaverError::Io(format!(
                            "Failed to stat {}: {}",
                            save.archive_path.display(),
                            e
                        ))
                    })?;
                    save.size = metadata.len();
                    game.total_size += save.size;
                    report.sizes_backfilled += 1;
                    debug!("backfilled size of {}", save.archive_path.display());
                }
            }
            self.format_version = FORMAT_VERSION_SIZES;
            report.applied.push(FORMAT_VERSION_SIZES);
        }

        Ok(report)
    }
}
