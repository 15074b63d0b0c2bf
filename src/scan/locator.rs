//! Source file location.
//!
//! Walks a project directory tree collecting the source files the import
//! extractor should scan, pruning dependency-store, version-control and
//! build-output directories.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

/// Directories that are never worth descending into.
const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "out",
    "coverage",
    ".next",
    ".nuxt",
    ".turbo",
    ".cache",
    "vendor",
];

/// File extensions treated as source files by default.
const DEFAULT_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "mjs", "cjs", "mts", "cts", "vue", "svelte",
];

/// Recursion depth bound; deeper trees are silently pruned rather than
/// failing the run (guards against symlink cycles).
const MAX_DEPTH: usize = 20;

/// Configuration for a source tree scan.
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    /// Root directory to scan.
    pub root: PathBuf,
    /// Allow-listed file extensions, lowercased.
    pub extensions: HashSet<String>,
    /// Directory basenames to prune without descending.
    pub excluded_dirs: HashSet<String>,
    /// Maximum directory depth below the root.
    pub max_depth: usize,
}

impl LocatorConfig {
    /// Creates a config with the default extension and exclusion sets.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS
                .iter()
                .map(|d| d.to_string())
                .collect(),
            max_depth: MAX_DEPTH,
        }
    }

    /// Adds extra extensions to the allow-list (stored lowercased).
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in extensions {
            self.extensions
                .insert(ext.as_ref().trim_start_matches('.').to_lowercase());
        }
        self
    }

    /// Adds extra directory basenames to the exclusion set.
    pub fn with_excluded_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for dir in dirs {
            self.excluded_dirs.insert(dir.as_ref().to_string());
        }
        self
    }
}

/// The outcome of a source tree scan: the collected files plus any
/// non-fatal warnings raised along the way.
///
/// Unreadable files or directories never abort the scan; they surface
/// here as warnings while sibling subtrees continue to be walked.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Files whose extension matched the allow-list. Order is not significant;
    /// consumers treat this as a set.
    pub files: Vec<PathBuf>,
    /// Human-readable warnings for skipped entries.
    pub warnings: Vec<String>,
}

/// Walks the tree under `config.root` collecting source files.
///
/// Any directory whose basename is in the exclusion set is pruned without
/// descending. Extension matching is case-insensitive. Read errors are
/// collected as warnings, never propagated.
pub fn find_source_files(config: &LocatorConfig) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    let walker = WalkDir::new(&config.root)
        .max_depth(config.max_depth)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &config.excluded_dirs));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                outcome.warnings.push(format!("Skipped {}: {}", path, err));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if has_allowed_extension(path, &config.extensions) {
            outcome.files.push(path.to_path_buf());
        }
    }

    outcome
}

/// Returns true if the entry is a directory that should be pruned.
fn is_excluded_dir(entry: &DirEntry, excluded: &HashSet<String>) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    excluded.contains(name.as_ref())
}

/// Case-insensitive extension allow-list check.
fn has_allowed_extension(path: &Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.contains(&ext.to_lowercase()))
}
