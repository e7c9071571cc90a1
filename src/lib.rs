//
// lib.rs
// CodeCount-rs
//
// Library entry that re-exports modules so the binary and the tests can reach configuration, per-file classification, scanning, orchestration, and reporting.
//
pub mod classify;
pub mod cli;
pub mod config;
pub mod orchestrator;
pub mod report;
pub mod scanner;

pub use classify::{classify_file, count_lines, ErrorDescriptor, FileError};
pub use cli::{build_options, Args, Options};
pub use config::{ExcludedDirSet, ExtensionSet, ScanConfig, MAX_FILE_SIZE};
pub use orchestrator::{run_count, run_in_current_dir, AggregateReport};
pub use report::{render_banner, render_report};
pub use scanner::{scan_dir, ScanResult};
