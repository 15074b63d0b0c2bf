//! Findings and the result reporter.
//!
//! Every detector produces [`Finding`] records and appends them to a shared
//! [`Reporter`] sink. The reporter only accumulates and displays; it never
//! computes. The two operations detectors rely on are
//! [`Reporter::add_findings`] (bulk append) and [`Reporter::clear`]
//! (reset between runs).

pub mod json;

use std::collections::HashMap;
use std::fmt;

use crossterm::style::Stylize;
use serde::Serialize;

/// The dependency hygiene category a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Declared but never imported in source.
    Unused,
    /// A newer version is published.
    Outdated,
    /// Installed at multiple resolved versions.
    Duplicate,
    /// Bundled size exceeds the configured thresholds.
    Heavy,
}

impl Category {
    /// Human-readable section heading for terminal output.
    pub fn heading(&self) -> &'static str {
        match self {
            Category::Unused => "Unused packages",
            Category::Outdated => "Outdated packages",
            Category::Duplicate => "Duplicate packages",
            Category::Heavy => "Heavy packages",
        }
    }

    /// Fixed display order for terminal output.
    pub const ALL: [Category; 4] = [
        Category::Unused,
        Category::Outdated,
        Category::Duplicate,
        Category::Heavy,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Unused => "unused",
            Category::Outdated => "outdated",
            Category::Duplicate => "duplicate",
            Category::Heavy => "heavy",
        };
        write!(f, "{}", s)
    }
}

/// How much a finding should worry the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        write!(f, "{}", s)
    }
}

/// A single diagnostic produced by a detector.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// Which hygiene check produced this finding.
    pub category: Category,
    /// The package the finding is about.
    pub package: String,
    /// Human-readable explanation.
    pub message: String,
    /// Severity of the issue.
    pub severity: Severity,
    /// Extra machine-readable details (e.g. versions, sizes, the
    /// `infrastructure` marker).
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl Finding {
    /// Creates a finding with empty metadata.
    pub fn new(
        category: Category,
        package: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            package: package.into(),
            message: message.into(),
            severity,
            metadata: HashMap::new(),
        }
    }

    /// Attaches a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns true if this finding carries the infrastructure marker.
    pub fn is_infrastructure(&self) -> bool {
        self.metadata.get("infrastructure").map(String::as_str) == Some("true")
    }
}

/// Accumulates findings and informational output for one run.
///
/// The reporter is a sink: detectors append, it displays. It owns no
/// analysis logic and is cleared between runs.
#[derive(Debug, Default)]
pub struct Reporter {
    findings: Vec<Finding>,
}

impl Reporter {
    /// Creates an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a batch of findings.
    pub fn add_findings(&mut self, findings: Vec<Finding>) {
        self.findings.extend(findings);
    }

    /// Resets the reporter between runs.
    pub fn clear(&mut self) {
        self.findings.clear();
    }

    /// All findings accumulated so far.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Prints an informational progress line.
    ///
    /// Goes to stderr, like warnings: stdout is reserved for rendered
    /// findings so piped output (e.g. `--format json | jq`) stays clean.
    pub fn info(&self, message: &str) {
        eprintln!("{}", message);
    }

    /// Prints a non-fatal warning line.
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "warning:".yellow().bold(), message);
    }

    /// Prints a fatal error line.
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message);
    }

    /// Renders all accumulated findings grouped by category, with
    /// infrastructure entries visually separated from truly-unused ones,
    /// followed by a summary line.
    pub fn render(&self) {
        if self.findings.is_empty() {
            println!("{}", "No issues found.".green());
            return;
        }

        for category in Category::ALL {
            let in_category: Vec<&Finding> = self
                .findings
                .iter()
                .filter(|f| f.category == category)
                .collect();
            if in_category.is_empty() {
                continue;
            }

            println!();
            println!("{}", category.heading().bold().underlined());

            for finding in in_category.iter().filter(|f| !f.is_infrastructure()) {
                println!(
                    "  {} {} - {}",
                    severity_tag(finding.severity),
                    finding.package.as_str().bold(),
                    finding.message
                );
            }

            let infra: Vec<&Finding> = in_category
                .iter()
                .copied()
                .filter(|f| f.is_infrastructure())
                .collect();
            if !infra.is_empty() {
                println!("  {}", "Tooling (not imported directly):".dim());
                for finding in infra {
                    println!(
                        "  {} {} - {}",
                        severity_tag(finding.severity),
                        finding.package.as_str().bold(),
                        finding.message
                    );
                }
            }
        }

        println!();
        println!("{}", self.summary_line());
    }

    /// One-line count summary across all findings.
    pub fn summary_line(&self) -> String {
        let high = self
            .findings
            .iter()
            .filter(|f| f.severity == Severity::High)
            .count();
        let medium = self
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Medium)
            .count();
        let low = self
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Low)
            .count();
        format!(
            "{} finding(s): {} high, {} medium, {} low",
            self.findings.len(),
            high,
            medium,
            low
        )
    }
}

/// Colored severity tag for terminal output.
fn severity_tag(severity: Severity) -> String {
    match severity {
        Severity::High => format!("[{}]", "high".red().bold()),
        Severity::Medium => format!("[{}]", "medium".yellow()),
        Severity::Low => format!("[{}]", "low".dim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_finding(package: &str, severity: Severity) -> Finding {
        Finding::new(Category::Unused, package, severity, "never imported")
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Unused.to_string(), "unused");
        assert_eq!(Category::Heavy.to_string(), "heavy");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn test_finding_metadata_marker() {
        let plain = sample_finding("left-pad", Severity::Medium);
        assert!(!plain.is_infrastructure());

        let infra = sample_finding("typescript", Severity::Low)
            .with_metadata("infrastructure", "true");
        assert!(infra.is_infrastructure());
    }

    #[test]
    fn test_reporter_accumulates_and_clears() {
        let mut reporter = Reporter::new();
        reporter.add_findings(vec![
            sample_finding("a", Severity::Low),
            sample_finding("b", Severity::Medium),
        ]);
        reporter.add_findings(vec![sample_finding("c", Severity::High)]);

        assert_eq!(reporter.findings().len(), 3);

        reporter.clear();
        assert!(reporter.findings().is_empty());
    }

    #[test]
    fn test_summary_line_counts() {
        let mut reporter = Reporter::new();
        reporter.add_findings(vec![
            sample_finding("a", Severity::Low),
            sample_finding("b", Severity::Medium),
            sample_finding("c", Severity::Medium),
            sample_finding("d", Severity::High),
        ]);

        let summary = reporter.summary_line();
        assert!(summary.contains("4 finding(s)"));
        assert!(summary.contains("1 high"));
        assert!(summary.contains("2 medium"));
        assert!(summary.contains("1 low"));
    }
}
