//! Configuration module for saver
//!
//! This module provides path resolution for the persisted registry file and
//! the default archive root used when a fresh registry is created.

pub mod paths;

pub use paths::SaverPaths;
