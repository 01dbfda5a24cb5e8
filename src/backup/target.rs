//! Save target shapes
//!
//! A game's live save is either a single file or a directory tree. The shape
//! is probed once per operation and decides both how an artifact is written
//! and how it is put back.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;

use tracing::debug;

use crate::archive::{self, PackedArchive};
use crate::error::{SaverError, SaverResult};

/// Shape of a live save location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    /// A single regular file, stored as a verbatim copy
    File,
    /// A directory tree, stored as a packed archive
    Directory,
}

impl SaveTarget {
    /// Stat `path` and classify it
    pub fn probe(path: &Path) -> SaverResult<Self> {
        let metadata = fs::metadata(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                SaverError::target_not_found(path.display().to_string())
            } else {
                SaverError::Io(format!("Failed to stat {}: {}", path.display(), e))
            }
        })?;

        if metadata.is_file() {
            Ok(Self::File)
        } else if metadata.is_dir() {
            Ok(Self::Directory)
        } else {
            Err(SaverError::Io(format!(
                "{} is neither a file nor a directory",
                path.display()
            )))
        }
    }

    /// Write the contents of `source` into a freshly created artifact
    ///
    /// Returns the artifact handle, flushed and synced, so the caller can
    /// measure it.
    pub(crate) fn capture(self, source: &Path, artifact: File) -> SaverResult<File> {
        match self {
            Self::File => {
                let mut input = File::open(source).map_err(|e| {
                    SaverError::Io(format!("Failed to open {}: {}", source.display(), e))
                })?;
                let mut output = BufWriter::new(artifact);
                let copied = io::copy(&mut input, &mut output).map_err(|e| {
                    SaverError::Io(format!("Failed to copy {}: {}", source.display(), e))
                })?;
                debug!("ok, copied {}", copied);
                archive::finish_file(output)
            }
            Self::Directory => {
                let output = archive::pack_into(source, BufWriter::new(artifact))?;
                archive::finish_file(output)
            }
        }
    }

    /// Replace the live save at `target` with the contents of `artifact`
    ///
    /// A directory target is removed entirely before extraction. The archive
    /// is opened first so an unreadable artifact leaves the live save alone,
    /// but a failure after the removal is not rolled back.
    pub(crate) fn restore(self, artifact: &Path, target: &Path) -> SaverResult<()> {
        match self {
            Self::File => {
                let mut input = File::open(artifact).map_err(|e| {
                    if e.kind() == io::ErrorKind::NotFound {
                        SaverError::artifact_not_found(artifact.display().to_string())
                    } else {
                        SaverError::Io(format!("Failed to open {}: {}", artifact.display(), e))
                    }
                })?;
                let mut output = File::create(target).map_err(|e| {
                    SaverError::Io(format!("Failed to truncate {}: {}", target.display(), e))
                })?;

                debug!("copying {} to {}", artifact.display(), target.display());
                let copied = io::copy(&mut input, &mut output).map_err(|e| {
                    SaverError::Io(format!("Failed to restore {}: {}", target.display(), e))
                })?;
                debug!("ok, copied {}", copied);
                Ok(())
            }
            Self::Directory => {
                let mut packed = PackedArchive::open(artifact)?;

                debug!("removing all from {}", target.display());
                fs::remove_dir_all(target).map_err(|e| {
                    SaverError::Io(format!("Failed to clear {}: {}", target.display(), e))
                })?;

                debug!("unzipping {} to {}", artifact.display(), target.display());
                let written = packed.extract_to(target)?;
                debug!("restored {} file(s)", written);
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for SaveTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}
