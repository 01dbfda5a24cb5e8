//! Archive codec for directory saves
//!
//! Directory save targets are stored as a single zip container. Member names
//! are the file paths relative to the save directory, always joined with `/`
//! so archives move freely between operating systems.
//!
//! # Example
//!
//! ```rust,ignore
//! use saver::archive::{pack, unpack};
//!
//! let size = pack(&save_dir, &artifact)?;
//! unpack(&artifact, &save_dir)?;
//! ```

mod codec;

pub(crate) use codec::finish_file;
pub use codec::{pack, pack_into, unpack, PackedArchive};
