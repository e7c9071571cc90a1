use std::collections::HashSet;
use std::ffi::OsStr;

/// Files larger than this (in bytes) are reported as errors and never read.
pub const MAX_FILE_SIZE: u64 = 2 * 1024 * 1024;

const CODE_EXTENSIONS: &[&str] = &[
    ".py", ".java", ".c", ".cpp", ".h", ".hpp", ".cs", ".dart", ".rs", ".go", ".swift", ".kt",
    ".kts", ".js", ".ts", ".jsx", ".tsx", ".php", ".rb", ".groovy", ".scala", ".lua", ".r", ".pl",
    ".sh", ".bash", ".ps1", ".html", ".css", ".scss", ".sass", ".less", ".vue", ".svelte", ".yml",
    ".yaml", ".toml", ".ini", ".xml", ".json", ".sql", ".m", ".mm", ".hs", ".elm", ".clj",
    ".cljc", ".cljs",
];

const EXCLUDED_DIRS: &[&str] = &[
    // VCS
    ".git",
    ".svn",
    ".hg",
    ".bzr",
    ".cvs",
    // editors
    ".idea",
    ".vscode",
    ".vs",
    ".atom",
    ".settings",
    // virtualenvs
    "venv",
    "env",
    "virtualenv",
    "venv-win",
    "venv27",
    "venv34",
    // dependencies
    "node_modules",
    "jspm_packages",
    "bower_components",
    "vendor",
    // build output
    "dist",
    "build",
    "target",
    "out",
    "bin",
    "obj",
    "release",
    // caches and scratch
    "__pycache__",
    ".cache",
    ".pytest_cache",
    "tmp",
    "temp",
    "logs",
    "coverage",
    ".nyc_output",
    "test-results",
    // assets and data
    "public",
    "static",
    "assets",
    "media",
    "migrations",
    "data",
];

/// Normalized (lower-case, leading dot) extensions that count as code.
#[derive(Debug, Clone)]
pub struct ExtensionSet(HashSet<String>);

impl ExtensionSet {
    pub fn new<I, S>(exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = exts
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()))
            .filter(|e| e.len() > 1)
            .collect();
        ExtensionSet(set)
    }

    pub fn contains(&self, ext: &str) -> bool {
        self.0.contains(ext)
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        ExtensionSet::new(CODE_EXTENSIONS)
    }
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

/// Bare directory names that are never descended into, at any depth.
#[derive(Debug, Clone)]
pub struct ExcludedDirSet(HashSet<String>);

impl ExcludedDirSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExcludedDirSet(names.into_iter().map(Into::into).collect())
    }

    /// Exact, case-sensitive match. Names that are not valid UTF-8 never match.
    pub fn contains(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.0.contains(n))
    }
}

impl Default for ExcludedDirSet {
    fn default() -> Self {
        ExcludedDirSet::new(EXCLUDED_DIRS.iter().copied())
    }
}

/// Immutable configuration for one run, built once at startup.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub extensions: ExtensionSet,
    pub excluded_dirs: ExcludedDirSet,
    pub max_file_size: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            extensions: ExtensionSet::default(),
            excluded_dirs: ExcludedDirSet::default(),
            max_file_size: MAX_FILE_SIZE,
        }
    }
}
