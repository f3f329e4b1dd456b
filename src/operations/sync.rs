// Sync Engine
// File and directory synchronization primitives

use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::detect::needs_copy;
use crate::error::{Result, SyncError};

/// Outcome of syncing a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Destination was absent and has been created
    Copied,
    /// Destination existed but was stale and has been overwritten
    Updated,
    /// Destination already matched the source
    Unchanged,
}

/// What kind of destination entry an orphan removal deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalKind {
    File,
    Directory,
}

/// A single orphan removed from a destination tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// Path relative to the synced destination directory
    pub path: PathBuf,
    pub kind: RemovalKind,
}

/// Counters produced by a directory sync
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirSyncStats {
    /// Files created because the destination was missing them
    pub copied: usize,
    /// Files overwritten because the destination copy was stale
    pub updated: usize,
    /// Orphans removed (a removed directory counts once)
    pub removed: usize,
    /// Every orphan removed, in the order it was deleted
    pub removals: Vec<Removal>,
}

impl DirSyncStats {
    /// True when the sync touched nothing
    pub fn is_up_to_date(&self) -> bool {
        self.copied == 0 && self.updated == 0 && self.removed == 0
    }

    fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Copied => self.copied += 1,
            FileOutcome::Updated => self.updated += 1,
            FileOutcome::Unchanged => {}
        }
    }

    fn record_removal(&mut self, path: PathBuf, kind: RemovalKind) {
        self.removed += 1;
        self.removals.push(Removal { path, kind });
    }
}

/// Sync a single file from source to destination
pub fn sync_file(source: &Path, dest: &Path) -> Result<FileOutcome> {
    let Ok(dest_meta) = fs::symlink_metadata(dest) else {
        // Ensure destination directory exists
        if let Some(parent) = dest.parent() {
            create_dir_all(parent)?;
        }
        copy_file(source, dest)?;
        debug!(source = %source.display(), dest = %dest.display(), "copied");
        return Ok(FileOutcome::Copied);
    };

    // Links are never written through; a link or directory in the way is replaced
    if dest_meta.is_file() {
        if !needs_copy(source, dest)? {
            return Ok(FileOutcome::Unchanged);
        }
    } else {
        remove_path(dest)?;
    }
    copy_file(source, dest)?;
    debug!(source = %source.display(), dest = %dest.display(), "updated");
    Ok(FileOutcome::Updated)
}

/// Make `dest` mirror `source`: copy new and stale files, then prune orphans
///
/// The destination directory is created if it does not exist. Any
/// filesystem error aborts the sync and leaves the destination partially
/// synced.
pub fn sync_directory(source: &Path, dest: &Path) -> Result<DirSyncStats> {
    let mut stats = DirSyncStats::default();

    create_dir_all(dest)?;

    // Walk source, copy new/changed files
    for entry in WalkDir::new(source)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source_err| SyncError::Walk {
            path: source.to_path_buf(),
            source: source_err,
        })?;

        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let target = dest.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            ensure_dir(&target, relative, &mut stats)?;
        } else if file_type.is_file() {
            let outcome = sync_file(entry.path(), &target)?;
            stats.record(outcome);
        } else {
            warn!(path = %entry.path().display(), "skipping special file");
        }
    }

    // Walk destination bottom-up, remove anything the source does not have
    prune_orphans(source, dest, Path::new(""), &mut stats)?;

    Ok(stats)
}

/// Copy a whole directory tree into `dest`, creating it and any parents
///
/// Returns the number of files copied.
pub fn copy_tree(source: &Path, dest: &Path) -> Result<usize> {
    let mut copied = 0;

    create_dir_all(dest)?;

    for entry in WalkDir::new(source)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source_err| SyncError::Walk {
            path: source.to_path_buf(),
            source: source_err,
        })?;

        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            copy_file(entry.path(), &target)?;
            copied += 1;
        } else {
            warn!(path = %entry.path().display(), "skipping special file");
        }
    }

    debug!(source = %source.display(), dest = %dest.display(), files = copied, "copied tree");
    Ok(copied)
}

/// Copy one file, carrying over its access and modification times
pub fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    fs::copy(source, dest).map_err(|err| SyncError::Copy {
        from: source.to_path_buf(),
        to: dest.to_path_buf(),
        source: err,
    })?;

    // Preserve timestamps so the change detector sees the copy as current
    let metadata = fs::metadata(source).map_err(|err| SyncError::Metadata {
        path: source.to_path_buf(),
        source: err,
    })?;
    let atime = FileTime::from_last_access_time(&metadata);
    let mtime = FileTime::from_last_modification_time(&metadata);

    filetime::set_file_times(dest, atime, mtime).map_err(|err| SyncError::Mtime {
        path: dest.to_path_buf(),
        source: err,
    })
}

/// Remove a file, link or whole directory tree
pub fn remove_path(path: &Path) -> Result<()> {
    let is_dir = fs::symlink_metadata(path)
        .map(|m| m.is_dir())
        .map_err(|err| SyncError::Metadata {
            path: path.to_path_buf(),
            source: err,
        })?;

    let result = if is_dir {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    result.map_err(|err| SyncError::Remove {
        path: path.to_path_buf(),
        source: err,
    })
}

pub(crate) fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|err| SyncError::CreateDir {
        path: path.to_path_buf(),
        source: err,
    })
}

/// Make sure a mirrored destination directory exists
fn ensure_dir(target: &Path, relative: &Path, stats: &mut DirSyncStats) -> Result<()> {
    match fs::symlink_metadata(target) {
        Ok(meta) if meta.is_dir() => return Ok(()),
        // A file or link where the source has a directory is an orphan too
        Ok(_) => {
            remove_path(target)?;
            debug!(path = %target.display(), "removed entry shadowing a directory");
            stats.record_removal(relative.to_path_buf(), RemovalKind::File);
        }
        Err(_) => {}
    }

    create_dir_all(target)
}

/// Reverse pass: children are examined before their parent is left
///
/// Destination entries are classified without following links.
fn prune_orphans(
    source_dir: &Path,
    dest_dir: &Path,
    relative: &Path,
    stats: &mut DirSyncStats,
) -> Result<()> {
    let mut entries = fs::read_dir(dest_dir)
        .and_then(|iter| iter.collect::<std::io::Result<Vec<_>>>())
        .map_err(|err| SyncError::ReadDir {
            path: dest_dir.to_path_buf(),
            source: err,
        })?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name();
        let dest_path = entry.path();
        let source_path = source_dir.join(&name);
        let relative_path = relative.join(&name);
        let file_type = entry.file_type().map_err(|err| SyncError::Metadata {
            path: dest_path.clone(),
            source: err,
        })?;

        // Links are leaves: never descended into, only removed themselves
        if file_type.is_dir() {
            if source_path.is_dir() {
                prune_orphans(&source_path, &dest_path, &relative_path, stats)?;
            } else {
                remove_path(&dest_path)?;
                debug!(path = %dest_path.display(), "removed orphan directory");
                stats.record_removal(relative_path, RemovalKind::Directory);
            }
        } else if file_type.is_symlink() || !source_path.is_file() {
            remove_path(&dest_path)?;
            debug!(path = %dest_path.display(), "removed orphan file");
            stats.record_removal(relative_path, RemovalKind::File);
        }
    }

    Ok(())
}
