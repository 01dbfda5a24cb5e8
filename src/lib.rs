//! saver - versioned save-game backups
//!
//! This library provides the core functionality for the `saver` tool. It keeps
//! an ordered history of snapshots of a game's save location (a single file or
//! a whole directory), and can restore any of them or delete old ones.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Config file path resolution
//! - `error`: Custom error types
//! - `models`: Core data models (games, saves, save indices)
//! - `archive`: Zip packing for directory saves
//! - `backup`: Backup, restore and delete of saves
//! - `storage`: The persisted game registry
//! - `display`: Terminal tables
//! - `cli`: Command handlers
//! - `server`: Loopback HTTP control surface
//! - `logging`: tracing subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use saver::backup::BackupManager;
//! use saver::config::SaverPaths;
//! use saver::storage::Storage;
//!
//! let mut storage = Storage::open(SaverPaths::new("saver.json")?)?;
//! let game = storage.registry_mut().require_game_mut("rpg")?;
//! BackupManager::new(game).backup(Some("before boss"))?;
//! storage.mark_dirty();
//! storage.save_if_dirty()?;
//! ```

pub mod archive;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod server;
pub mod storage;

pub use error::{SaverError, SaverResult};
