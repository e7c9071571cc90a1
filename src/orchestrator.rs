use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::info;

use crate::classify::{classify_file, ErrorDescriptor};
use crate::config::ScanConfig;
use crate::scanner::{scan_dir, ScanResult};

#[derive(Debug, Default)]
pub struct AggregateReport {
    pub root: PathBuf,
    pub subdirs: BTreeMap<String, ScanResult>,
    pub loose_files: BTreeMap<String, u64>, // bare name -> lines
    pub loose_extensions: BTreeSet<String>,
    pub errors: Vec<ErrorDescriptor>,
    pub scanned_dirs: u64,
    pub scanned_files: u64,
    pub total_lines: u64,
    pub elapsed: Duration,
}

impl AggregateReport {
    pub fn loose_lines(&self) -> u64 {
        self.loose_files.values().sum()
    }

    /// Every extension counted anywhere in the run.
    pub fn all_extensions(&self) -> BTreeSet<&str> {
        self.subdirs
            .values()
            .flat_map(|s| s.extensions_seen.iter())
            .chain(self.loose_extensions.iter())
            .map(String::as_str)
            .collect()
    }
}

/// Counts the process working directory.
pub fn run_in_current_dir<W: Write>(config: &ScanConfig, out: &mut W) -> Result<AggregateReport> {
    let root = env::current_dir().context("Cannot resolve the working directory")?;
    run_count(&root, config, out)
}

/// Scans each non-excluded subdirectory of `root`, then counts the loose
/// files directly inside it, and merges everything into one report.
///
/// Progress lines go to `out`. Only failures outside the per-file loop
/// (listing `root` itself, writing progress) are returned as errors.
pub fn run_count<W: Write>(root: &Path, config: &ScanConfig, out: &mut W) -> Result<AggregateReport> {
    let started = Instant::now();
    writeln!(out, "🔍 Scanning directory: {}\n", root.display())?;

    let mut entries = fs::read_dir(root)
        .with_context(|| format!("Cannot list {}", root.display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Cannot read an entry of {}", root.display()))?;
    entries.sort_by_key(|e| e.file_name());

    let mut report = AggregateReport {
        root: root.to_path_buf(),
        ..Default::default()
    };

    for entry in entries.iter().filter(|e| e.path().is_dir()) {
        let name = entry.file_name();
        if config.excluded_dirs.contains(&name) {
            continue;
        }
        let name = name.to_string_lossy().into_owned();
        writeln!(out, "📂 Scanning subdirectory: {name}")?;
        info!(subdir = %name, "scan started");

        let result = scan_dir(
            &entry.path(),
            &config.extensions,
            &config.excluded_dirs,
            config.max_file_size,
        );
        report.total_lines += result.total_lines;
        report.scanned_dirs += result.scanned_dirs;
        report.scanned_files += result.scanned_files;
        report.errors.extend(result.error_files.iter().cloned());
        report.subdirs.insert(name, result);
    }

    writeln!(out, "\n📝 Scanning files in the current directory...")?;
    for entry in entries.iter().filter(|e| e.path().is_file()) {
        let path = entry.path();
        match classify_file(&path, &config.extensions, config.max_file_size) {
            Ok(None) => {}
            Ok(Some(counted)) => {
                let name = entry.file_name().to_string_lossy().into_owned();
                report.total_lines += counted.lines;
                report.scanned_files += 1;
                report.loose_extensions.insert(counted.extension);
                report.loose_files.insert(name, counted.lines);
            }
            Err(error) => report.errors.push(ErrorDescriptor { path, error }),
        }
    }

    report.elapsed = started.elapsed();
    info!(
        total_lines = report.total_lines,
        errors = report.errors.len(),
        "run finished"
    );
    Ok(report)
}
