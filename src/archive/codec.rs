//! Zip-backed archive codec
//!
//! Packs every regular file under a directory into one zip container keyed by
//! its forward-slash relative path, and extracts such a container back into a
//! directory tree. Directories are not stored; they are recreated from member
//! paths on extraction.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Seek, Write};
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::write::{FileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

use crate::error::{SaverError, SaverResult};

/// Pack `source_dir` into a new artifact at `dest`, returning the artifact size
///
/// The artifact is created (or truncated) at `dest`. On error the partially
/// written file is left in place for the caller to remove.
pub fn pack(source_dir: &Path, dest: &Path) -> SaverResult<u64> {
    let file = File::create(dest)
        .map_err(|e| SaverError::Io(format!("Failed to create {}: {}", dest.display(), e)))?;
    let file = finish_file(pack_into(source_dir, BufWriter::new(file))?)?;

    let size = file
        .metadata()
        .map_err(|e| SaverError::Io(format!("Failed to stat {}: {}", dest.display(), e)))?
        .len();
    Ok(size)
}

/// Pack `source_dir` into any seekable writer, returning the writer once the
/// archive has been finalized
pub fn pack_into<W: Write + Seek>(source_dir: &Path, writer: W) -> SaverResult<W> {
    let mut archive = ZipWriter::new(writer);
    let options = member_options();
    let mut members = 0usize;

    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            SaverError::Io(format!("Failed to walk {}: {}", source_dir.display(), e))
        })?;

        if !entry.file_type().is_file() {
            debug!("skipping {}", entry.path().display());
            continue;
        }

        let relative = entry.path().strip_prefix(source_dir).map_err(|e| {
            SaverError::Io(format!("Failed to relativize {}: {}", entry.path().display(), e))
        })?;
        let name = member_name(relative)?;

        let mut source = File::open(entry.path()).map_err(|e| {
            SaverError::Io(format!("Failed to open {}: {}", entry.path().display(), e))
        })?;

        debug!("compressing {}", name);
        archive
            .start_file(name.as_str(), options)
            .map_err(|e| SaverError::Io(format!("Failed to add {}: {}", name, e)))?;
        io::copy(&mut source, &mut archive)
            .map_err(|e| SaverError::Io(format!("Failed to pack {}: {}", name, e)))?;
        members += 1;
    }

    let writer = archive
        .finish()
        .map_err(|e| SaverError::Io(format!("Failed to finalize archive: {}", e)))?;
    debug!("packed {} file(s) from {}", members, source_dir.display());
    Ok(writer)
}

/// Extract the artifact at `artifact` into `dest_dir`, returning the number of
/// files written
pub fn unpack(artifact: &Path, dest_dir: &Path) -> SaverResult<usize> {
    PackedArchive::open(artifact)?.extract_to(dest_dir)
}

/// An opened, validated directory archive
pub struct PackedArchive {
    path: PathBuf,
    inner: ZipArchive<BufReader<File>>,
}

impl PackedArchive {
    /// Open an artifact and read its central directory
    pub fn open(path: &Path) -> SaverResult<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                SaverError::artifact_not_found(path.display().to_string())
            } else {
                SaverError::Io(format!("Failed to open {}: {}", path.display(), e))
            }
        })?;

        let inner = ZipArchive::new(BufReader::new(file)).map_err(|e| {
            SaverError::CorruptArchive(format!("{}: {}", path.display(), e))
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the archive has no members
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Stored member names, forward-slash separated
    pub fn member_names(&self) -> Vec<String> {
        self.inner.file_names().map(str::to_string).collect()
    }

    /// Read one member by its stored name
    pub fn read_member(&mut self, name: &str) -> SaverResult<Vec<u8>> {
        let mut member = self.inner.by_name(name).map_err(|e| match e {
            ZipError::FileNotFound => SaverError::NotFound {
                entity_type: "Archive member",
                identifier: name.to_string(),
            },
            other => SaverError::CorruptArchive(format!("{}: {}", self.path.display(), other)),
        })?;

        let mut bytes = Vec::new();
        io::copy(&mut member, &mut bytes)
            .map_err(|e| SaverError::CorruptArchive(format!("{}: {}", name, e)))?;
        Ok(bytes)
    }

    /// Write every member below `dest_dir`, overwriting existing files
    pub fn extract_to(&mut self, dest_dir: &Path) -> SaverResult<usize> {
        fs::create_dir_all(dest_dir).map_err(|e| {
            SaverError::Io(format!("Failed to create {}: {}", dest_dir.display(), e))
        })?;

        let mut written = 0usize;
        for i in 0..self.inner.len() {
            let mut member = self
                .inner
                .by_index(i)
                .map_err(|e| SaverError::CorruptArchive(format!("{}: {}", self.path.display(), e)))?;
            let name = member.name().to_string();
            let target = dest_dir.join(member_path(&name)?);

            if member.is_dir() {
                fs::create_dir_all(&target).map_err(|e| {
                    SaverError::Io(format!("Failed to create {}: {}", target.display(), e))
                })?;
                continue;
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    SaverError::Io(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }

            let mut out = File::create(&target).map_err(|e| {
                SaverError::Io(format!("Failed to create {}: {}", target.display(), e))
            })?;

            debug!("decompressing {}", name);
            let mut bytes = Vec::with_capacity(member.size() as usize);
            member
                .read_to_end(&mut bytes)
                .map_err(|e| SaverError::CorruptArchive(format!("{}: {}", name, e)))?;
            out.write_all(&bytes)
                .map_err(|e| SaverError::Io(format!("Failed to extract {}: {}", name, e)))?;
            debug!("ok, wrote {} bytes", bytes.len());
            written += 1;
        }

        Ok(written)
    }
}

/// Flush a buffered artifact and make sure it hits the disk
pub(crate) fn finish_file(writer: BufWriter<File>) -> SaverResult<File> {
    let file = writer
        .into_inner()
        .map_err(|e| SaverError::Io(format!("Failed to flush archive: {}", e.error())))?;
    file.sync_all()
        .map_err(|e| SaverError::Io(format!("Failed to sync archive: {}", e)))?;
    Ok(file)
}

fn member_options() -> FileOptions<'static, ()> {
    FileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// Build the portable member name for a path relative to the packed root
fn member_name(relative: &Path) -> SaverResult<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| {
                    SaverError::Io(format!("Non UTF-8 file name: {}", relative.display()))
                })?;
                parts.push(part);
            }
            _ => {
                return Err(SaverError::Io(format!(
                    "Unexpected path component in {}",
                    relative.display()
                )))
            }
        }
    }
    Ok(parts.join("/"))
}

/// Translate a stored member name into a host path below the extraction root
fn member_path(name: &str) -> SaverResult<PathBuf> {
    let unsafe_member = || SaverError::CorruptArchive(format!("Unsafe member path \"{}\"", name));

    if name.starts_with('/') {
        return Err(unsafe_member());
    }

    let mut out = PathBuf::new();
    for part in name.split('/') {
        match part {
            "" | "." => continue,
            ".." => return Err(unsafe_member()),
            part => out.push(part),
        }
    }

    let normal = out
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if out.as_os_str().is_empty() || !normal {
        return Err(unsafe_member());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn write_tree(root: &Path, files: &[(&str, &str)]) {
        for (rel, contents) in files {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
    }

    fn read_tree(root: &Path) -> BTreeMap<String, Vec<u8>> {
        WalkDir::new(root)
            .into_iter()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let rel = member_name(e.path().strip_prefix(root).unwrap()).unwrap();
                (rel, fs::read(e.path()).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_pack_unpack_round_trip() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        write_tree(
            &source,
            &[
                ("a.txt", "alpha"),
                ("sub/b.txt", "beta"),
                ("empty.sav", ""),
            ],
        );
        fs::create_dir_all(source.join("sub/deeper")).unwrap();
        fs::write(source.join("sub/deeper/c.bin"), [0u8, 159, 146, 150]).unwrap();

        let artifact = temp.path().join("artifact");
        let size = pack(&source, &artifact).unwrap();
        assert_eq!(size, fs::metadata(&artifact).unwrap().len());

        let dest = temp.path().join("dest");
        let written = unpack(&artifact, &dest).unwrap();
        assert_eq!(written, 4);
        assert_eq!(read_tree(&source), read_tree(&dest));
    }

    #[test]
    fn test_members_use_forward_slashes() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        write_tree(&source, &[("slot1/data/save.dat", "x")]);

        let artifact = temp.path().join("artifact");
        pack(&source, &artifact).unwrap();

        let archive = PackedArchive::open(&artifact).unwrap();
        assert_eq!(archive.member_names(), vec!["slot1/data/save.dat".to_string()]);
    }

    #[test]
    fn test_directories_are_not_members() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        fs::create_dir_all(source.join("empty_dir")).unwrap();
        write_tree(&source, &[("f", "1")]);

        let artifact = temp.path().join("artifact");
        pack(&source, &artifact).unwrap();

        let archive = PackedArchive::open(&artifact).unwrap();
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_random_access_member() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        write_tree(&source, &[("a", "first"), ("z/y", "second")]);

        let artifact = temp.path().join("artifact");
        pack(&source, &artifact).unwrap();

        let mut archive = PackedArchive::open(&artifact).unwrap();
        assert_eq!(archive.read_member("z/y").unwrap(), b"second");
        assert!(archive.read_member("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_unpack_overwrites_existing_files() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        write_tree(&source, &[("save.dat", "new")]);
        let artifact = temp.path().join("artifact");
        pack(&source, &artifact).unwrap();

        let dest = temp.path().join("dest");
        write_tree(&dest, &[("save.dat", "old and longer")]);
        unpack(&artifact, &dest).unwrap();

        assert_eq!(fs::read(dest.join("save.dat")).unwrap(), b"new");
    }

    #[test]
    fn test_pack_into_memory() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("x", "y")]);

        let cursor = pack_into(temp.path(), Cursor::new(Vec::new())).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        assert_eq!(archive.len(), 1);
        assert!(archive.by_name("x").is_ok());
    }

    #[test]
    fn test_corrupt_artifact() {
        let temp = TempDir::new().unwrap();
        let artifact = temp.path().join("artifact");
        fs::write(&artifact, b"definitely not a zip file").unwrap();

        let err = unpack(&artifact, &temp.path().join("dest")).err().unwrap();
        assert!(matches!(err, SaverError::CorruptArchive(_)));
    }

    #[test]
    fn test_corrupt_member_data() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        write_tree(&source, &[("a.txt", &"alpha ".repeat(64))]);
        let artifact = temp.path().join("artifact");
        pack(&source, &artifact).unwrap();

        // Local header is 30 bytes plus the member name, then compressed data
        let mut bytes = fs::read(&artifact).unwrap();
        for b in &mut bytes[35..40] {
            *b ^= 0xff;
        }
        fs::write(&artifact, bytes).unwrap();

        let err = unpack(&artifact, &temp.path().join("dest")).err().unwrap();
        assert!(matches!(err, SaverError::CorruptArchive(_)), "{:?}", err);
    }

    #[test]
    fn test_missing_artifact() {
        let temp = TempDir::new().unwrap();
        let err = PackedArchive::open(&temp.path().join("nope")).err().unwrap();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_member_path_rejects_escapes() {
        assert!(member_path("../evil").is_err());
        assert!(member_path("a/../../evil").is_err());
        assert!(member_path("/etc/passwd").is_err());
        assert!(member_path("").is_err());
        assert_eq!(member_path("a/b/c").unwrap(), Path::new("a").join("b").join("c"));
        assert_eq!(member_path("./a").unwrap(), PathBuf::from("a"));
    }

    #[test]
    fn test_member_name_joins_with_slash() {
        let rel = Path::new("a").join("b").join("c.txt");
        assert_eq!(member_name(&rel).unwrap(), "a/b/c.txt");
    }
}
