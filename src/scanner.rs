use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::{DirEntry, WalkDir};

use crate::classify::{classify_file, ErrorDescriptor};
use crate::config::{ExcludedDirSet, ExtensionSet};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub total_lines: u64,
    pub extensions_seen: BTreeSet<String>,
    pub file_details: BTreeMap<PathBuf, u64>, // path as walked -> lines
    pub error_files: Vec<ErrorDescriptor>,    // encounter order
    pub scanned_dirs: u64,
    pub scanned_files: u64,
}

fn is_excluded(entry: &DirEntry, excluded_dirs: &ExcludedDirSet) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && excluded_dirs.contains(entry.file_name())
}

/// Recursively counts every allowed file under `root`.
///
/// Never fails: per-file problems land in `error_files`, and directories the
/// walk cannot read are skipped with a warning.
pub fn scan_dir(
    root: &Path,
    extensions: &ExtensionSet,
    excluded_dirs: &ExcludedDirSet,
    max_file_size: u64,
) -> ScanResult {
    let mut result = ScanResult::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    // walkdir yields a directory before listing it; a listing failure arrives
    // as the very next item and un-counts that directory.
    let mut last_dir: Option<PathBuf> = None;

    for entry in walker.filter_entry(|e| !is_excluded(e, excluded_dirs)) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if let Some(dir) = last_dir.take() {
                    if err.path() == Some(dir.as_path()) {
                        result.scanned_dirs -= 1;
                    }
                }
                warn!("skipping unreadable entry: {err}");
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            result.scanned_dirs += 1;
            last_dir = Some(entry.path().to_path_buf());
            continue;
        }
        last_dir = None;
        // Symlinked directories are listed but never entered.
        if file_type.is_symlink() && entry.path().is_dir() {
            continue;
        }

        result.scanned_files += 1;
        let path = entry.path();
        match classify_file(path, extensions, max_file_size) {
            Ok(None) => {}
            Ok(Some(counted)) => {
                result.total_lines += counted.lines;
                result.extensions_seen.insert(counted.extension);
                result.file_details.insert(path.to_path_buf(), counted.lines);
            }
            Err(error) => result.error_files.push(ErrorDescriptor {
                path: path.to_path_buf(),
                error,
            }),
        }
    }

    result
}
