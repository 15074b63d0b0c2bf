//! Usage resolution: is a declared package referenced anywhere in source?
//!
//! Cross-references declared package names against the import references
//! extracted from the project's source files. Supports a single-package
//! form that short-circuits on the first hit and a batch form that
//! pre-extracts the union of all references once, so N packages cost
//! O(files x refs + packages x distinct-refs) instead of a rescan per
//! package.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::scan::ImportExtractor;

/// Decides whether one import reference satisfies one package name.
///
/// Rules, in order:
/// 1. exact match
/// 2. sub-path match: the reference starts with `package + "/"` (so
///    `lodash/debounce` satisfies `lodash`, but `react-dom` does not
///    satisfy `react`)
/// 3. scope-prefix match: for `@scope/...` packages, any reference that
///    starts with the full package name counts. This is looser than the
///    sub-path rule: `@scope/foobar` satisfies `@scope/foo`. Kept as
///    observed upstream behavior; see DESIGN.md.
pub fn reference_satisfies(reference: &str, package: &str) -> bool {
    if reference == package {
        return true;
    }
    if reference.len() > package.len()
        && reference.starts_with(package)
        && reference.as_bytes()[package.len()] == b'/'
    {
        return true;
    }
    package.starts_with('@') && reference.starts_with(package)
}

/// Resolves per-package usage verdicts against a set of source files.
///
/// Owns the run-scoped caches: the import extractor's per-file cache and a
/// verdict cache keyed by (package name, file-list length). Both are
/// cleared by [`reset`], which the unused-package detector calls exactly
/// once at the start of each run.
///
/// [`reset`]: UsageResolver::reset
pub struct UsageResolver {
    extractor: ImportExtractor,
    verdict_cache: HashMap<(String, usize), bool>,
}

impl UsageResolver {
    /// Creates a resolver wrapping the given extractor.
    pub fn new(extractor: ImportExtractor) -> Self {
        Self {
            extractor,
            verdict_cache: HashMap::new(),
        }
    }

    /// Clears both run-scoped caches. Not safe to skip between runs:
    /// source files may have changed.
    pub fn reset(&mut self) {
        self.extractor.reset();
        self.verdict_cache.clear();
    }

    /// Drains non-fatal warnings raised while reading files.
    pub fn take_warnings(&mut self) -> Vec<String> {
        self.extractor.take_warnings()
    }

    /// Returns true if any import reference in any of the files satisfies
    /// the package name. Stops scanning at the first hit, both across files
    /// and within a file's reference list.
    pub fn is_used(&mut self, package: &str, files: &[PathBuf]) -> bool {
        let key = (package.to_string(), files.len());
        if let Some(&verdict) = self.verdict_cache.get(&key) {
            return verdict;
        }

        let mut used = false;
        'scan: for file in files {
            let refs = self.extractor.extract(file);
            for reference in refs.iter() {
                if reference_satisfies(reference, package) {
                    used = true;
                    break 'scan;
                }
            }
        }

        self.verdict_cache.insert(key, used);
        used
    }

    /// Resolves usage for every candidate package in one pass.
    ///
    /// Extracts the union of import references across all files once, then
    /// tests each package against that shared set. Exact matches are served
    /// from a hash set; the prefix rules scan the distinct references.
    pub fn batch_usage(
        &mut self,
        packages: &[String],
        files: &[PathBuf],
    ) -> HashMap<String, bool> {
        let mut all_refs: HashSet<String> = HashSet::new();
        for file in files {
            let refs = self.extractor.extract(file);
            all_refs.extend(refs.iter().cloned());
        }

        let mut verdicts = HashMap::with_capacity(packages.len());
        for package in packages {
            let used = all_refs.contains(package)
                || all_refs
                    .iter()
                    .any(|reference| reference_satisfies(reference, package));
            self.verdict_cache
                .insert((package.clone(), files.len()), used);
            verdicts.insert(package.clone(), used);
        }

        verdicts
    }
}

impl Default for UsageResolver {
    fn default() -> Self {
        Self::new(ImportExtractor::default())
    }
}
