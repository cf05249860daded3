//! Archive engine: full-rebuild compression, extraction, deletion
//!
//! Every compression pass rebuilds the bundle from scratch: matching
//! files are copied into a staging directory preserving their relative
//! paths, the old archive is deleted, and a fresh gzip-compressed tar
//! is written from the staged tree. Archives are deterministic (sorted
//! walk, zeroed header metadata) so an unchanged file set produces a
//! byte-identical bundle.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use tar::{EntryType, Header};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Typed failures of the archive engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk {}: {}", .dir.display(), .source)]
    Walk {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("archive entry has unusable path: {0}")]
    BadEntryPath(String),
}

impl EngineError {
    fn io(context: impl Into<String>) -> impl FnOnce(io::Error) -> Self {
        let context = context.into();
        move |source| Self::Io { context, source }
    }
}

/// Result of one compression pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressOutcome {
    /// Archive rebuilt from `files` staged copies
    Archived { files: usize },
    /// Nothing matched; any existing archive was left untouched
    NoMatches,
}

/// Result of one extraction pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// `files` entries written under the destination root
    Extracted { files: usize },
    /// No archive at the given path; nothing was written
    NotFound,
}

/// Enumerate files under `source_dir` matching `extension`
///
/// Files inside `staging_dir` are excluded so staging copies are never
/// picked up when the staging tree overlaps the source tree.
pub fn matching_files(
    source_dir: &Path,
    staging_dir: &Path,
    extension: &str,
) -> Result<Vec<PathBuf>> {
    let mut matches = Vec::new();

    for entry in WalkDir::new(source_dir).sort_by(|a, b| a.path().cmp(b.path())) {
        let entry = entry.map_err(|source| EngineError::Walk {
            dir: source_dir.to_path_buf(),
            source,
        })?;

        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if path.starts_with(staging_dir) {
            continue;
        }
        if path.extension().map_or(false, |ext| ext == extension) {
            matches.push(path.to_path_buf());
        }
    }

    Ok(matches)
}

/// Rebuild the archive from the current set of matching files
///
/// Returns [`CompressOutcome::NoMatches`] without touching the existing
/// archive when nothing matches. On failure the staging directory is
/// removed best-effort before the error is returned; releasing the run
/// guard is the caller's responsibility.
pub fn compress(
    source_dir: &Path,
    archive_path: &Path,
    staging_dir: &Path,
    extension: &str,
) -> Result<CompressOutcome> {
    let matches = matching_files(source_dir, staging_dir, extension)?;
    if matches.is_empty() {
        info!(
            dir = %source_dir.display(),
            "no matching metadata files; leaving existing archive untouched"
        );
        return Ok(CompressOutcome::NoMatches);
    }

    let outcome = stage_and_pack(source_dir, archive_path, staging_dir, &matches);

    if outcome.is_err() && staging_dir.exists() {
        if let Err(err) = fs::remove_dir_all(staging_dir) {
            warn!(%err, dir = %staging_dir.display(), "failed to clean up staging directory");
        }
    }

    outcome
}

fn stage_and_pack(
    source_dir: &Path,
    archive_path: &Path,
    staging_dir: &Path,
    files: &[PathBuf],
) -> Result<CompressOutcome> {
    // Stale staging from a crashed run is reclaimable state
    if staging_dir.exists() {
        fs::remove_dir_all(staging_dir)
            .map_err(EngineError::io("failed to delete stale staging directory"))?;
    }
    fs::create_dir_all(staging_dir)
        .map_err(EngineError::io("failed to create staging directory"))?;

    for file in files {
        let rel = file
            .strip_prefix(source_dir)
            .map_err(|_| EngineError::BadEntryPath(file.display().to_string()))?;
        let staged = staging_dir.join(rel);

        if let Some(parent) = staged.parent() {
            fs::create_dir_all(parent)
                .map_err(EngineError::io(format!("failed to create {}", parent.display())))?;
        }
        fs::copy(file, &staged)
            .map_err(EngineError::io(format!("failed to stage {}", file.display())))?;
        debug!(file = %rel.display(), "staged");
    }

    if archive_path.exists() {
        fs::remove_file(archive_path)
            .map_err(EngineError::io("failed to delete previous archive"))?;
    }

    pack_dir(staging_dir, archive_path)?;

    fs::remove_dir_all(staging_dir)
        .map_err(EngineError::io("failed to remove staging directory"))?;

    info!(
        files = files.len(),
        archive = %archive_path.display(),
        "archive rebuilt"
    );
    Ok(CompressOutcome::Archived { files: files.len() })
}

/// Write a deterministic tar.gz of everything under `root`
fn pack_dir(root: &Path, archive_path: &Path) -> Result<()> {
    let out = File::create(archive_path)
        .map_err(EngineError::io(format!("failed to create {}", archive_path.display())))?;
    let encoder = GzEncoder::new(out, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.follow_symlinks(false);

    for entry in WalkDir::new(root).sort_by(|a, b| a.path().cmp(b.path())) {
        let entry = entry.map_err(|source| EngineError::Walk {
            dir: root.to_path_buf(),
            source,
        })?;

        let path = entry.path();
        if path == root {
            continue;
        }
        let rel = path
            .strip_prefix(root)
            .map_err(|_| EngineError::BadEntryPath(path.display().to_string()))?;
        let rel_name = archive_entry_name(rel)?;

        let metadata = fs::symlink_metadata(path)
            .map_err(EngineError::io(format!("failed to stat {}", path.display())))?;

        let mut header = Header::new_gnu();
        header.set_mtime(0);
        header.set_uid(0);
        header.set_gid(0);

        if metadata.is_dir() {
            header.set_entry_type(EntryType::Directory);
            header.set_mode(0o755);
            header.set_size(0);
            builder
                .append_data(&mut header, Path::new(&rel_name), io::empty())
                .map_err(EngineError::io(format!("failed to add {rel_name}")))?;
        } else {
            header.set_entry_type(EntryType::Regular);
            header.set_mode(0o644);
            header.set_size(metadata.len());
            let file = File::open(path)
                .map_err(EngineError::io(format!("failed to open {}", path.display())))?;
            builder
                .append_data(&mut header, Path::new(&rel_name), file)
                .map_err(EngineError::io(format!("failed to add {rel_name}")))?;
        }
    }

    let encoder = builder
        .into_inner()
        .map_err(EngineError::io("failed to finish tar stream"))?;
    encoder
        .finish()
        .map_err(EngineError::io("failed to finish gzip stream"))?;
    Ok(())
}

/// Extract every archive entry under `dest_root`
///
/// Entries stream independently: a failure aborts the remaining entries
/// but already-written files stay in place. Existing files are
/// truncated and overwritten. Directory entries are created, not
/// streamed. Absolute or parent-escaping entry paths are rejected so a
/// bundle cannot write outside the destination.
pub fn extract(archive_path: &Path, dest_root: &Path) -> Result<ExtractOutcome> {
    if !archive_path.exists() {
        return Ok(ExtractOutcome::NotFound);
    }

    let file = File::open(archive_path)
        .map_err(EngineError::io(format!("failed to open {}", archive_path.display())))?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));

    let mut files = 0usize;
    let entries = archive
        .entries()
        .map_err(EngineError::io("failed to read archive"))?;

    for entry in entries {
        let mut entry = entry.map_err(EngineError::io("failed to read archive entry"))?;
        let raw = entry
            .path()
            .map_err(EngineError::io("failed to read entry path"))?
            .into_owned();

        let Some(rel) = clean_entry_path(&raw)? else {
            continue;
        };
        let dest = dest_root.join(&rel);

        if entry.header().entry_type().is_dir() {
            fs::create_dir_all(&dest)
                .map_err(EngineError::io(format!("failed to create {}", dest.display())))?;
            continue;
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(EngineError::io(format!("failed to create {}", parent.display())))?;
        }

        let mut out = File::create(&dest)
            .map_err(EngineError::io(format!("failed to create {}", dest.display())))?;
        io::copy(&mut entry, &mut out)
            .map_err(EngineError::io(format!("failed to write {}", dest.display())))?;

        debug!(file = %rel.display(), "extracted");
        files += 1;
    }

    info!(files, dest = %dest_root.display(), "archive extracted");
    Ok(ExtractOutcome::Extracted { files })
}

/// Delete every matching metadata file under `source_dir`
pub fn delete_all(source_dir: &Path, staging_dir: &Path, extension: &str) -> Result<usize> {
    let matches = matching_files(source_dir, staging_dir, extension)?;

    for file in &matches {
        fs::remove_file(file)
            .map_err(EngineError::io(format!("failed to delete {}", file.display())))?;
    }

    info!(files = matches.len(), dir = %source_dir.display(), "metadata files deleted");
    Ok(matches.len())
}

/// Forward-slash entry name for a source-relative path
fn archive_entry_name(rel: &Path) -> Result<String> {
    let name = rel.to_string_lossy().replace('\\', "/");
    if name.is_empty() || name.starts_with('/') {
        return Err(EngineError::BadEntryPath(rel.display().to_string()));
    }
    Ok(name)
}

/// Normalize an entry path for extraction
///
/// Returns `None` for entries that reduce to nothing (e.g. "."),
/// and an error for absolute paths or `..` components.
fn clean_entry_path(raw: &Path) -> Result<Option<PathBuf>> {
    let mut clean = PathBuf::new();

    for component in raw.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => return Err(EngineError::BadEntryPath(raw.display().to_string())),
        }
    }

    if clean.as_os_str().is_empty() {
        Ok(None)
    } else {
        Ok(Some(clean))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn archive_entries(archive_path: &Path) -> Vec<String> {
        let file = File::open(archive_path).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        archive
            .entries()
            .unwrap()
            .map(|e| {
                let entry = e.unwrap();
                let name = entry.path().unwrap().to_string_lossy().into_owned();
                match entry.header().entry_type() {
                    EntryType::Directory => format!("{name}/"),
                    _ => name,
                }
            })
            .collect()
    }

    #[test]
    fn test_compress_enumerates_only_matches() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("Assets");
        let staging = temp_dir.path().join("staging");
        let archive = source.join("bundle.tar.gz");

        write(&source, "a/x.meta", "guid: 1");
        write(&source, "a/b/y.meta", "guid: 2");
        write(&source, "c.txt", "not metadata");

        let outcome = compress(&source, &archive, &staging, "meta").unwrap();
        assert_eq!(outcome, CompressOutcome::Archived { files: 2 });
        assert!(archive.exists());
        assert!(!staging.exists());

        let files: Vec<_> = archive_entries(&archive)
            .into_iter()
            .filter(|name| !name.ends_with('/'))
            .collect();
        assert_eq!(files, vec!["a/b/y.meta", "a/x.meta"]);
    }

    #[test]
    fn test_round_trip_preserves_bytes_and_paths() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("Assets");
        let staging = temp_dir.path().join("staging");
        let archive = temp_dir.path().join("bundle.tar.gz");

        write(&source, "a/x.meta", "guid: aaaa\nfileFormatVersion: 2\n");
        write(&source, "a/b/y.meta", "guid: bbbb\n");

        compress(&source, &archive, &staging, "meta").unwrap();

        let dest = temp_dir.path().join("restored");
        let outcome = extract(&archive, &dest).unwrap();
        assert_eq!(outcome, ExtractOutcome::Extracted { files: 2 });

        assert_eq!(
            fs::read(dest.join("a/x.meta")).unwrap(),
            b"guid: aaaa\nfileFormatVersion: 2\n"
        );
        assert_eq!(fs::read(dest.join("a/b/y.meta")).unwrap(), b"guid: bbbb\n");
    }

    #[test]
    fn test_compress_is_byte_identical_without_changes() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("Assets");
        let staging = temp_dir.path().join("staging");
        let archive = temp_dir.path().join("bundle.tar.gz");

        write(&source, "a/x.meta", "guid: 1");
        write(&source, "z.meta", "guid: 2");

        compress(&source, &archive, &staging, "meta").unwrap();
        let first = fs::read(&archive).unwrap();

        compress(&source, &archive, &staging, "meta").unwrap();
        let second = fs::read(&archive).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_no_matches_leaves_archive_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("Assets");
        let staging = temp_dir.path().join("staging");
        let archive = temp_dir.path().join("bundle.tar.gz");

        fs::create_dir_all(&source).unwrap();
        write(&source, "c.txt", "not metadata");
        fs::write(&archive, b"previous archive bytes").unwrap();

        let outcome = compress(&source, &archive, &staging, "meta").unwrap();
        assert_eq!(outcome, CompressOutcome::NoMatches);
        assert_eq!(fs::read(&archive).unwrap(), b"previous archive bytes");
        assert!(!staging.exists());
    }

    #[test]
    fn test_staged_copies_are_excluded_from_enumeration() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("Assets");
        // Staging inside the source tree, as the original tool laid it out
        let staging = source.join("cache");
        let archive = temp_dir.path().join("bundle.tar.gz");

        write(&source, "x.meta", "guid: 1");
        write(&staging, "leftover.meta", "stale staged copy");

        let matches = matching_files(&source, &staging, "meta").unwrap();
        assert_eq!(matches, vec![source.join("x.meta")]);

        let outcome = compress(&source, &archive, &staging, "meta").unwrap();
        assert_eq!(outcome, CompressOutcome::Archived { files: 1 });
    }

    #[test]
    fn test_extract_missing_archive() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("missing.tar.gz");
        let dest = temp_dir.path().join("restored");

        let outcome = extract(&archive, &dest).unwrap();
        assert_eq!(outcome, ExtractOutcome::NotFound);
        assert!(!dest.exists());
    }

    #[test]
    fn test_extract_overwrites_existing_files() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("Assets");
        let staging = temp_dir.path().join("staging");
        let archive = temp_dir.path().join("bundle.tar.gz");

        write(&source, "x.meta", "fresh");
        compress(&source, &archive, &staging, "meta").unwrap();

        let dest = temp_dir.path().join("restored");
        write(&dest, "x.meta", "stale local copy, longer than the bundle entry");

        extract(&archive, &dest).unwrap();
        assert_eq!(fs::read(dest.join("x.meta")).unwrap(), b"fresh");
    }

    #[test]
    fn test_delete_all_removes_only_matches() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("Assets");
        let staging = temp_dir.path().join("staging");

        write(&source, "a/x.meta", "guid: 1");
        write(&source, "a/b/y.meta", "guid: 2");
        write(&source, "keep.txt", "untouched");

        let removed = delete_all(&source, &staging, "meta").unwrap();
        assert_eq!(removed, 2);
        assert!(!source.join("a/x.meta").exists());
        assert!(!source.join("a/b/y.meta").exists());
        assert!(source.join("keep.txt").exists());
    }

    #[test]
    fn test_clean_entry_path_rejects_escapes() {
        assert!(clean_entry_path(Path::new("../evil.meta")).is_err());
        assert!(clean_entry_path(Path::new("a/../../evil.meta")).is_err());
        assert!(clean_entry_path(Path::new("/abs/evil.meta")).is_err());

        assert_eq!(clean_entry_path(Path::new(".")).unwrap(), None);
        assert_eq!(
            clean_entry_path(Path::new("./a/b.meta")).unwrap(),
            Some(PathBuf::from("a/b.meta"))
        );
    }
}
