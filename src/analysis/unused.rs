//! The unused-package detector.
//!
//! Composes the manifest reader, source file locator, usage resolver and
//! infrastructure classifier into one linear pipeline:
//!
//! 1. reset the run-scoped caches
//! 2. read the declared dependencies (empty manifest ends the run early
//!    with an explicit "no dependencies" outcome, not an error)
//! 3. locate source files
//! 4. resolve usage for all declared packages in one batch
//! 5. partition the unused packages into truly-unused vs infrastructure
//! 6. emit findings and a summary
//!
//! Findings are only emitted once the full batch usage map exists; a
//! failed run emits none at all.

use crate::analysis::infrastructure;
use crate::analysis::usage::UsageResolver;
use crate::manifest::{self, ManifestResult};
use crate::report::{Category, Finding, Reporter, Severity};
use crate::scan::{find_source_files, LocatorConfig};

/// Counts from a completed unused-package analysis.
///
/// Every declared package lands in exactly one of the three buckets:
/// `used + truly_unused + infrastructure == total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnusedSummary {
    /// Declared packages examined.
    pub total: usize,
    /// Packages referenced somewhere in source.
    pub used: usize,
    /// Packages with no references and no tooling justification.
    pub truly_unused: usize,
    /// Packages with no references but a known tooling role.
    pub infrastructure: usize,
}

/// Outcome of a detector run.
///
/// An empty manifest is not a clean result; it is its own outcome so
/// callers can tell "nothing declared" apart from "everything used".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedReport {
    /// The manifest declares no dependencies at all.
    NoDependencies,
    /// The full pipeline ran.
    Analyzed(UnusedSummary),
}

/// Orchestrates one unused-package analysis run.
///
/// Owns the run-scoped caches through its [`UsageResolver`] and clears
/// them at the start of every run, so repeated in-process invocations
/// never see stale cross-run data.
pub struct UnusedDetector {
    resolver: UsageResolver,
}

impl UnusedDetector {
    /// Creates a detector with fresh caches.
    pub fn new() -> Self {
        Self {
            resolver: UsageResolver::default(),
        }
    }

    /// Runs the pipeline, appending findings to `reporter`.
    ///
    /// Manifest failures (missing or malformed package.json) propagate to
    /// the caller, which surfaces them once as a user-facing error; no
    /// findings are emitted for a failed run. Per-file read failures are
    /// forwarded to the reporter as warnings and never abort the run.
    pub fn run(
        &mut self,
        config: &LocatorConfig,
        reporter: &mut Reporter,
    ) -> ManifestResult<UnusedReport> {
        self.resolver.reset();

        let declared = manifest::read_dependencies(&config.root)?;
        if declared.is_empty() {
            reporter.info("No dependencies declared; nothing to check.");
            return Ok(UnusedReport::NoDependencies);
        }

        let scan = find_source_files(config);
        for warning in &scan.warnings {
            reporter.warn(warning);
        }
        reporter.info(&format!(
            "Checking {} declared package(s) against {} source file(s)",
            declared.len(),
            scan.files.len()
        ));

        // Sorted for a stable findings order across runs.
        let mut packages: Vec<String> = declared.into_keys().collect();
        packages.sort();

        let verdicts = self.resolver.batch_usage(&packages, &scan.files);
        for warning in self.resolver.take_warnings() {
            reporter.warn(&warning);
        }

        let mut findings = Vec::new();
        let mut summary = UnusedSummary {
            total: packages.len(),
            used: 0,
            truly_unused: 0,
            infrastructure: 0,
        };

        for package in &packages {
            if verdicts.get(package).copied().unwrap_or(false) {
                summary.used += 1;
                continue;
            }

            // Only the unused branch consults the classifier; a used
            // package is never reported regardless of its listing.
            match infrastructure::classify(package) {
                Some(reason) => {
                    summary.infrastructure += 1;
                    findings.push(
                        Finding::new(Category::Unused, package, Severity::Low, reason)
                            .with_metadata("infrastructure", "true"),
                    );
                }
                None => {
                    summary.truly_unused += 1;
                    findings.push(Finding::new(
                        Category::Unused,
                        package,
                        Severity::Medium,
                        "Declared in package.json but never imported in source",
                    ));
                }
            }
        }

        reporter.add_findings(findings);
        reporter.info(&format!(
            "{} used, {} unused, {} tooling",
            summary.used, summary.truly_unused, summary.infrastructure
        ));

        Ok(UnusedReport::Analyzed(summary))
    }
}

impl Default for UnusedDetector {
    fn default() -> Self {
        Self::new()
    }
}
