//! Deletes the map files of a save that fall inside a region.
//!
//! Map files (`map_X_Y`) each hold 10x10 tiles, so the region's tile coordinates are bucketed
//! before being compared. Chunk metadata files (`chunkdata_X_Y`, `zpop_X_Y`) are compared
//! against the region's chunk coordinates directly.
pub mod boundary;
pub mod classify;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use thiserror::Error;

use crate::config::Region;
use crate::fs_manager::{self, Removal};
use crate::logging::ActionSink;
use boundary::RegionBounds;
use classify::SaveFile;

#[derive(Error, Debug)]
pub enum ResetError {
    #[error("Cannot list the save directory {path}: {source}")]
    DirectoryUnavailable { path: PathBuf, source: io::Error },
}

/// Shared flag telling a running reset to stop removing files.
#[derive(Clone, Default, Debug)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Default, Debug)]
pub struct ResetOptions {
    /// Only report what would be removed.
    pub dry_run: bool,
    pub cancel: CancelToken,
}

/// What a reset did. With `dry_run`, the counts are what would have been removed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResetOutcome {
    pub map_files_deleted: usize,
    pub meta_files_deleted: usize,
    pub failed_deletions: usize,
    pub elapsed: Duration,
    /// The scan stopped early because it was cancelled.
    pub cancelled: bool,
}

impl ResetOutcome {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

#[derive(Debug, Clone, Copy)]
enum Category {
    Map,
    Meta,
}

/// Removes every file of `directory` covered by `region`, writing each action to `log`.
///
/// A file that fails to be removed is logged and counted, the scan goes on. Only a directory
/// that cannot be listed is an error, and it is reported before anything is removed.
pub fn reset_region(
    directory: &Path,
    region: &Region,
    log: &mut dyn ActionSink,
    options: &ResetOptions,
) -> Result<ResetOutcome, ResetError> {
    reset_region_with(directory, region, log, options, fs_manager::remove_file)
}

/// [`reset_region`] with the per-file removal supplied by the caller.
fn reset_region_with(
    directory: &Path,
    region: &Region,
    log: &mut dyn ActionSink,
    options: &ResetOptions,
    mut remove: impl FnMut(&Path) -> Removal,
) -> Result<ResetOutcome, ResetError> {
    let timer = Instant::now();
    let files =
        fs_manager::list_files(directory).map_err(|source| ResetError::DirectoryUnavailable {
            path: directory.to_path_buf(),
            source,
        })?;
    debug!("Found {} files in {}", files.len(), directory.display());

    let bounds = RegionBounds::from(region);
    let mut outcome = ResetOutcome::default();

    for path in files {
        if options.cancel.is_cancelled() {
            outcome.cancelled = true;
            break;
        }

        // Names that are not UTF-8 cannot match any pattern.
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };

        let category = match classify::classify(name) {
            SaveFile::Map { x, y } if bounds.tiles.contains(x, y) => Category::Map,
            SaveFile::Meta { x, y } if bounds.chunks.contains(x, y) => Category::Meta,
            _ => continue,
        };

        if options.dry_run {
            log.add_line(&format!("> Would delete {name}"));
            outcome.count(category);
            continue;
        }

        log.add_line(&format!("> Deleting {name}"));
        match remove(&path) {
            Removal::Removed => outcome.count(category),
            Removal::AlreadyGone => debug!("{name} was already removed"),
            Removal::Failed(e) => {
                warn!("Failed to delete {}: {e}", path.display());
                log.add_line(&format!(">> Failed: {e}"));
                outcome.failed_deletions += 1;
            }
        }
    }

    outcome.elapsed = timer.elapsed();
    write_summary(log, &outcome, options.dry_run);
    info!(
        "Reset of '{}' finished: {} map files, {} meta files, {} failures",
        region.name, outcome.map_files_deleted, outcome.meta_files_deleted, outcome.failed_deletions
    );

    Ok(outcome)
}

impl ResetOutcome {
    fn count(&mut self, category: Category) {
        match category {
            Category::Map => self.map_files_deleted += 1,
            Category::Meta => self.meta_files_deleted += 1,
        }
    }
}

fn write_summary(log: &mut dyn ActionSink, outcome: &ResetOutcome, dry_run: bool) {
    let verb = if dry_run { "Would remove" } else { "Removed" };

    log.add_header("Summary");
    if outcome.cancelled {
        log.add_line("> Interrupted before every file was checked");
    }
    log.add_line(&format!(
        "> Completed in {:.2} seconds",
        outcome.elapsed_seconds()
    ));
    log.add_line(&format!(
        "> {verb} {} map files",
        group_thousands(outcome.map_files_deleted)
    ));
    log.add_line(&format!(
        "> {verb} {} meta files",
        group_thousands(outcome.meta_files_deleted)
    ));
    if outcome.failed_deletions > 0 {
        log.add_line(&format!(
            "> Failed to remove {} files",
            group_thousands(outcome.failed_deletions)
        ));
    }
}

/// `1234567` -> `"1,234,567"`
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Corner;
    use crate::logging::MemorySink;
    use std::fs;
    use tempfile::TempDir;

    fn save_dir(names: &[&str]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"data").unwrap();
        }
        dir
    }

    fn remaining(dir: &TempDir) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    fn region(start: [i64; 4], stop: [i64; 4]) -> Region {
        Region {
            name: "Test".to_string(),
            start: Corner::from(start),
            stop: Corner::from(stop),
        }
    }

    fn run(dir: &TempDir, region: &Region) -> (ResetOutcome, MemorySink) {
        let mut log = MemorySink::default();
        let outcome =
            reset_region(dir.path(), region, &mut log, &ResetOptions::default()).unwrap();
        (outcome, log)
    }

    #[test]
    fn test_only_first_map_cell() {
        let dir = save_dir(&["map_0_0.bin", "map_5_5.bin", "chunkdata_12_12.bin"]);
        // Tiles 0..=9 are map cell 0, chunk rect far away.
        let region = region([0, 0, 100, 100], [9, 9, 101, 101]);

        let (outcome, log) = run(&dir, &region);

        assert_eq!(outcome.map_files_deleted, 1);
        assert_eq!(outcome.meta_files_deleted, 0);
        assert_eq!(outcome.failed_deletions, 0);
        assert_eq!(remaining(&dir), ["chunkdata_12_12.bin", "map_5_5.bin"]);
        assert!(log.lines.contains(&"> Deleting map_0_0.bin".to_string()));
    }

    #[test]
    fn test_map_and_meta_together() {
        let dir = save_dir(&["map_0_0.bin", "map_5_5.bin", "chunkdata_12_12.bin"]);
        let region = region([50, 50, 12, 12], [59, 59, 12, 12]);

        let (outcome, _) = run(&dir, &region);

        assert_eq!(outcome.map_files_deleted, 1);
        assert_eq!(outcome.meta_files_deleted, 1);
        assert_eq!(remaining(&dir), ["map_0_0.bin"]);
    }

    #[test]
    fn test_zpop_is_meta() {
        let dir = save_dir(&["zpop_3_4.bin", "zpop_3_5.bin"]);
        let region = region([0, 0, 3, 4], [0, 0, 3, 4]);

        let (outcome, _) = run(&dir, &region);

        assert_eq!(outcome.meta_files_deleted, 1);
        assert_eq!(remaining(&dir), ["zpop_3_5.bin"]);
    }

    #[test]
    fn test_negative_tiles_bucket_with_floor() {
        let dir = save_dir(&["map_-1_-1.bin", "map_0_0.bin", "map_-2_0.bin"]);
        // Tiles -5..=-1 are all in map cell -1.
        let region = region([-5, -5, 0, 0], [-1, -1, -1, -1]);

        let (outcome, _) = run(&dir, &region);

        assert_eq!(outcome.map_files_deleted, 1);
        assert_eq!(remaining(&dir), ["map_-2_0.bin", "map_0_0.bin"]);
    }

    #[test]
    fn test_region_spanning_zero() {
        let dir = save_dir(&["map_-1_-1.bin", "map_0_0.bin", "map_1_1.bin", "map_2_2.bin"]);
        let region = region([-5, -5, 0, 0], [15, 15, -1, -1]);

        let (outcome, _) = run(&dir, &region);

        assert_eq!(outcome.map_files_deleted, 3);
        assert_eq!(remaining(&dir), ["map_2_2.bin"]);
    }

    #[test]
    fn test_unrecognized_files_are_kept() {
        let names = [
            "map_ver.bin",
            "map_t.bin",
            "map_0_0_0.bin",
            "players.db",
            "chunkdata_a_0.bin",
            "thumb.png",
        ];
        let dir = save_dir(&names);
        let region = region([-1000, -1000, -1000, -1000], [1000, 1000, 1000, 1000]);

        let (outcome, log) = run(&dir, &region);

        assert_eq!(outcome.map_files_deleted + outcome.meta_files_deleted, 0);
        assert_eq!(remaining(&dir).len(), names.len());
        assert!(!log.lines.iter().any(|l| l.starts_with("> Deleting")));
    }

    #[test]
    fn test_second_run_removes_nothing() {
        let dir = save_dir(&["map_0_0.bin", "chunkdata_0_0.bin", "players.db"]);
        let region = region([0, 0, 0, 0], [9, 9, 0, 0]);

        let (first, _) = run(&dir, &region);
        assert_eq!((first.map_files_deleted, first.meta_files_deleted), (1, 1));

        let (second, _) = run(&dir, &region);
        assert_eq!((second.map_files_deleted, second.meta_files_deleted), (0, 0));
        assert_eq!(second.failed_deletions, 0);
        assert_eq!(remaining(&dir), ["players.db"]);
    }

    #[test]
    fn test_inverted_region_matches_nothing() {
        let dir = save_dir(&["map_0_0.bin", "map_1_0.bin", "chunkdata_5_5.bin"]);
        let region = region([19, 0, 6, 0], [0, 9, 4, 10]);

        let (outcome, _) = run(&dir, &region);

        assert_eq!(outcome.map_files_deleted + outcome.meta_files_deleted, 0);
        assert_eq!(remaining(&dir).len(), 3);
    }

    #[test]
    fn test_subdirectories_are_left_alone() {
        let dir = save_dir(&["map_0_0.bin"]);
        fs::create_dir(dir.path().join("map_0_1.bin")).unwrap();
        let region = region([0, 0, 0, 0], [9, 19, 0, 0]);

        let (outcome, _) = run(&dir, &region);

        assert_eq!(outcome.map_files_deleted, 1);
        assert_eq!(outcome.failed_deletions, 0);
        assert!(dir.path().join("map_0_1.bin").is_dir());
    }

    #[test]
    fn test_dry_run_keeps_files() {
        let dir = save_dir(&["map_0_0.bin", "chunkdata_0_0.bin"]);
        let region = region([0, 0, 0, 0], [9, 9, 0, 0]);
        let options = ResetOptions {
            dry_run: true,
            ..Default::default()
        };
        let mut log = MemorySink::default();

        let outcome = reset_region(dir.path(), &region, &mut log, &options).unwrap();

        assert_eq!((outcome.map_files_deleted, outcome.meta_files_deleted), (1, 1));
        assert_eq!(remaining(&dir).len(), 2);
        assert!(log.lines.contains(&"> Would delete map_0_0.bin".to_string()));
        assert!(log.lines.contains(&"> Would remove 1 map files".to_string()));
    }

    #[test]
    fn test_cancelled_before_start() {
        let dir = save_dir(&["map_0_0.bin", "map_0_1.bin"]);
        let region = region([0, 0, 0, 0], [9, 19, 0, 0]);
        let options = ResetOptions::default();
        options.cancel.cancel();
        let mut log = MemorySink::default();

        let outcome = reset_region(dir.path(), &region, &mut log, &options).unwrap();

        assert!(outcome.cancelled);
        assert_eq!(outcome.map_files_deleted, 0);
        assert_eq!(remaining(&dir).len(), 2);
        assert_eq!(log.headers, ["Summary"]);
    }

    /// Cancels the reset as soon as the first file is being deleted.
    struct CancelOnFirstDelete {
        inner: MemorySink,
        cancel: CancelToken,
    }

    impl ActionSink for CancelOnFirstDelete {
        fn add_line(&mut self, message: &str) {
            if message.starts_with("> Deleting") {
                self.cancel.cancel();
            }
            self.inner.add_line(message);
        }

        fn add_header(&mut self, message: &str) {
            self.inner.add_header(message);
        }

        fn timestamp(&mut self) {
            self.inner.timestamp();
        }
    }

    #[test]
    fn test_cancelled_midway() {
        let dir = save_dir(&["map_0_0.bin", "map_0_1.bin", "map_0_2.bin"]);
        let region = region([0, 0, 0, 0], [9, 29, 0, 0]);
        let options = ResetOptions::default();
        let mut log = CancelOnFirstDelete {
            inner: MemorySink::default(),
            cancel: options.cancel.clone(),
        };

        let outcome = reset_region(dir.path(), &region, &mut log, &options).unwrap();

        // The file being deleted when the cancel arrived is still removed, nothing after it.
        assert!(outcome.cancelled);
        assert_eq!(outcome.map_files_deleted, 1);
        assert_eq!(remaining(&dir).len(), 2);
        let deleting = log
            .inner
            .lines
            .iter()
            .filter(|l| l.starts_with("> Deleting"))
            .count();
        assert_eq!(deleting, 1);
        assert!(log
            .inner
            .lines
            .contains(&"> Interrupted before every file was checked".to_string()));
        assert!(log.inner.lines.contains(&"> Removed 1 map files".to_string()));
    }

    #[test]
    fn test_failed_delete_does_not_stop_the_scan() {
        let dir = save_dir(&["map_0_0.bin", "map_0_1.bin", "chunkdata_0_0.bin", "players.db"]);
        let region = region([0, 0, 0, 0], [9, 19, 0, 0]);
        let mut log = MemorySink::default();

        let outcome = reset_region_with(
            dir.path(),
            &region,
            &mut log,
            &ResetOptions::default(),
            |path: &Path| {
                if path.ends_with("map_0_1.bin") {
                    Removal::Failed(io::Error::new(
                        io::ErrorKind::PermissionDenied,
                        "read-only file",
                    ))
                } else {
                    fs_manager::remove_file(path)
                }
            },
        )
        .unwrap();

        assert_eq!(outcome.map_files_deleted, 1);
        assert_eq!(outcome.meta_files_deleted, 1);
        assert_eq!(outcome.failed_deletions, 1);
        assert_eq!(remaining(&dir), ["map_0_1.bin", "players.db"]);
        assert!(log.lines.contains(&">> Failed: read-only file".to_string()));

        let summary = &log.lines[log.lines.len() - 4..];
        assert_eq!(summary[1], "> Removed 1 map files");
        assert_eq!(summary[2], "> Removed 1 meta files");
        assert_eq!(summary[3], "> Failed to remove 1 files");
    }

    #[test]
    fn test_vanished_file_is_not_a_failure() {
        let dir = save_dir(&["map_0_0.bin", "map_0_1.bin"]);
        let region = region([0, 0, 0, 0], [9, 19, 0, 0]);
        let mut log = MemorySink::default();

        let outcome = reset_region_with(
            dir.path(),
            &region,
            &mut log,
            &ResetOptions::default(),
            |path: &Path| {
                if path.ends_with("map_0_0.bin") {
                    Removal::AlreadyGone
                } else {
                    fs_manager::remove_file(path)
                }
            },
        )
        .unwrap();

        assert_eq!(outcome.map_files_deleted, 1);
        assert_eq!(outcome.failed_deletions, 0);
        assert!(!log.lines.iter().any(|l| l.starts_with("> Failed")));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("Saves");
        let region = region([0, 0, 0, 0], [9, 9, 0, 0]);
        let mut log = MemorySink::default();

        let result = reset_region(&missing, &region, &mut log, &ResetOptions::default());

        assert!(matches!(
            result,
            Err(ResetError::DirectoryUnavailable { path, .. }) if path == missing
        ));
        assert!(log.lines.is_empty());
        assert!(log.headers.is_empty());
    }

    #[test]
    fn test_summary_lines() {
        let dir = save_dir(&["map_0_0.bin", "zpop_0_0.bin", "chunkdata_0_0.bin"]);
        let region = region([0, 0, 0, 0], [9, 9, 0, 0]);

        let (_, log) = run(&dir, &region);

        assert_eq!(log.headers, ["Summary"]);
        let summary = &log.lines[log.lines.len() - 3..];
        assert!(summary[0].starts_with("> Completed in "));
        assert!(summary[0].ends_with(" seconds"));
        assert_eq!(summary[1], "> Removed 1 map files");
        assert_eq!(summary[2], "> Removed 2 meta files");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(65536), "65,536");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
