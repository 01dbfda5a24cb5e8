//! Backup engine for saver
//!
//! Provides the three operations that touch artifacts on disk: taking a
//! backup, restoring one, and deleting a range of them.
//!
//! # Architecture
//!
//! - `SaveTarget`: the shape of a live save (single file or directory tree)
//! - `BackupManager`: creates new saves and deletes old ones
//! - `RestoreManager`: resolves an index and puts a save back
//!
//! Both managers borrow a single `Game` mutably; persisting the registry is
//! left to the caller.
//!
//! # Artifact Format
//!
//! File targets are stored as a verbatim copy. Directory targets are packed
//! into a zip container (see [`crate::archive`]). Artifacts are named after
//! their UTC creation time, `YYYY-MM-DD_HHMMSS-mmm`.
//!
//! # Example
//!
//! ```rust,ignore
//! use saver::backup::{BackupManager, RestoreManager};
//! use saver::models::{SaveIndex, SaveRange};
//!
//! let save = BackupManager::new(&mut game).backup(Some("before boss"))?;
//! RestoreManager::new(&mut game).restore(SaveIndex::NEWEST)?;
//! let report = BackupManager::new(&mut game).delete(SaveRange::new(1, 2))?;
//! ```

mod manager;
mod restore;
mod target;

pub use manager::{checksum_all, BackupManager, ChecksumEntry, DeleteReport};
pub use restore::{RestoreManager, RestoreResult};
pub use target::SaveTarget;
