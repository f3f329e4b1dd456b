// Change Detector
// Decides whether a source file must be (re)copied to its destination

use std::fs;
use std::path::Path;

use crate::error::{Result, SyncError};

/// Check whether `dest` is missing or stale relative to `source`
///
/// Only existence, size and modification time are compared. Two files with
/// equal size and a destination at least as new as the source are treated
/// as up to date even if their bytes differ.
pub fn needs_copy(source: &Path, dest: &Path) -> Result<bool> {
    if !dest.is_file() {
        return Ok(true);
    }

    let source_meta = metadata(source)?;
    let dest_meta = metadata(dest)?;

    // Compare file sizes
    if source_meta.len() != dest_meta.len() {
        return Ok(true);
    }

    // Compare modification times (source newer = needs update)
    let source_mtime = modified(source, &source_meta)?;
    let dest_mtime = modified(dest, &dest_meta)?;

    Ok(source_mtime > dest_mtime)
}

fn metadata(path: &Path) -> Result<fs::Metadata> {
    fs::metadata(path).map_err(|source| SyncError::Metadata {
        path: path.to_path_buf(),
        source,
    })
}

fn modified(path: &Path, meta: &fs::Metadata) -> Result<std::time::SystemTime> {
    meta.modified().map_err(|source| SyncError::Metadata {
        path: path.to_path_buf(),
        source,
    })
}
