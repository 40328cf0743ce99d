//! Filesystem access of the save directory: listing its files and removing them.
//! File contents are never read.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

/// Outcome of removing one file.
#[derive(Debug)]
pub enum Removal {
    Removed,
    /// The file was already gone.
    AlreadyGone,
    Failed(io::Error),
}

/// Lists the files directly inside `dir`. Sub-directories are skipped.
///
/// Fails only if `dir` itself cannot be listed. An entry that cannot be inspected is reported
/// and skipped.
pub fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping an unreadable entry of {}: {e}", dir.display());
                continue;
            }
        };

        match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => {
                debug!("Skipping directory {}", entry.path().display());
            }
            Ok(_) => files.push(entry.path()),
            Err(e) => warn!("Skipping {}: {e}", entry.path().display()),
        }
    }

    Ok(files)
}

/// Removes a single file. Removing a file that no longer exists is not a failure.
pub fn remove_file(path: &Path) -> Removal {
    match fs::remove_file(path) {
        Ok(_) => Removal::Removed,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Removal::AlreadyGone,
        Err(e) => Removal::Failed(e),
    }
}
