use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

use crate::orchestrator::AggregateReport;

const SUBDIR_TOP_FILES: usize = 5;
const LOOSE_TOP_FILES: usize = 10;
const MAX_ERRORS_SHOWN: usize = 20;

/// Largest files first; equal counts ordered by the raw path text, so
/// `a.rs` comes before `a/b.rs`.
pub fn top_files<K: AsRef<Path>>(files: &BTreeMap<K, u64>, limit: usize) -> Vec<(&K, u64)> {
    let mut sorted: Vec<_> = files.iter().map(|(k, &n)| (k, n)).collect();
    sorted.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| a.0.as_ref().as_os_str().cmp(b.0.as_ref().as_os_str()))
    });
    sorted.truncate(limit);
    sorted
}

pub fn render_banner<W: Write>(out: &mut W) -> io::Result<()> {
    let rule = "=".repeat(80);
    writeln!(out, "{rule}")?;
    writeln!(out, "{:^78}", "Code Counter")?;
    writeln!(
        out,
        "{:^78}",
        format!("Version {} | Line statistics for source trees", env!("CARGO_PKG_VERSION"))
    )?;
    writeln!(out, "{rule}\n")
}

pub fn render_report<W: Write>(report: &AggregateReport, out: &mut W) -> io::Result<()> {
    writeln!(out, "\n================ 📊 Results ================")?;
    writeln!(out, "🕒 Elapsed: {:.2}s", report.elapsed.as_secs_f64())?;
    writeln!(out, "📁 Directories scanned: {}", report.scanned_dirs)?;
    writeln!(out, "📄 Files scanned: {}", report.scanned_files)?;
    writeln!(out, "❗ Files with errors: {}", report.errors.len())?;

    for (name, result) in &report.subdirs {
        let exts = if result.extensions_seen.is_empty() {
            "no code files".to_string()
        } else {
            result
                .extensions_seen
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(out, "\n📁 {name}/: {} lines ({exts})", result.total_lines)?;
        for (path, lines) in top_files(&result.file_details, SUBDIR_TOP_FILES) {
            let shown = path.strip_prefix(&report.root).unwrap_or(path);
            writeln!(out, "  └─ {}: {lines} lines", shown.display())?;
        }
    }

    if report.loose_files.is_empty() {
        writeln!(out, "\n📄 No code files in the current directory")?;
    } else {
        writeln!(
            out,
            "\n📄 Files in the current directory ({} lines):",
            report.loose_lines()
        )?;
        for (name, lines) in top_files(&report.loose_files, LOOSE_TOP_FILES) {
            writeln!(out, "  ├─ {name}: {lines} lines")?;
        }
        writeln!(out, "  └─ {} code files in total", report.loose_files.len())?;
    }

    let all_exts = report.all_extensions();
    writeln!(
        out,
        "\n🔤 File types found ({}): {}",
        all_exts.len(),
        all_exts.into_iter().collect::<Vec<_>>().join(", ")
    )?;

    if !report.errors.is_empty() {
        writeln!(out, "\n❌ Files with errors (first {MAX_ERRORS_SHOWN}):")?;
        for error in report.errors.iter().take(MAX_ERRORS_SHOWN) {
            writeln!(out, "  ! {error}")?;
        }
    }

    writeln!(out, "\n✅ Total lines of code: {}", report.total_lines)
}
