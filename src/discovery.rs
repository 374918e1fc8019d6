//! Input discovery: enumerate image files by glob pattern

use crate::errors::{BandStatsError, Result};
use glob::glob;
use std::path::{Path, PathBuf};

/// Find the files in `dir` whose names match `pattern`
///
/// Matches are returned sorted so that runs over the same directory process
/// files in the same order on every platform. Unreadable entries are logged
/// and skipped.
///
/// # Errors
///
/// Returns `InputDirectoryNotFound` if `dir` is not an existing directory and
/// `PatternError` if `pattern` is not a valid glob.
pub fn discover_images(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(BandStatsError::InputDirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let full_pattern = dir.join(pattern).to_string_lossy().to_string();
    log::debug!("Scanning for images with pattern: {}", full_pattern);

    let mut files = Vec::new();
    for entry in glob(&full_pattern)? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("Bad path from glob: {}", e),
        }
    }
    files.sort();

    Ok(files)
}

/// Number of files in `dir` matching `pattern`
///
/// # Errors
///
/// See [`discover_images`].
pub fn count_images(dir: &Path, pattern: &str) -> Result<usize> {
    discover_images(dir, pattern).map(|files| files.len())
}
