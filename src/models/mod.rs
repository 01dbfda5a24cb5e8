//! Core data models for saver
//!
//! This module contains the data structures that make up a registry: games,
//! their saves, and the indices used to address saves.

pub mod game;
pub mod index;
pub mod save;

pub use game::{Game, GameInfo};
pub use index::{SaveIndex, SaveRange};
pub use save::{artifact_name, checksum_file, Save};
