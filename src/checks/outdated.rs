//! Outdated-package check, backed by `npm outdated --json`.
//!
//! npm already knows how to compare installed versions against the
//! registry, so this check is a thin wrapper: run the command, parse its
//! JSON map, and turn each entry into a finding.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

use serde::Deserialize;

use super::{CheckError, CheckOutcome};
use crate::report::{Category, Finding, Severity};

/// One entry of `npm outdated --json` output.
#[derive(Debug, Deserialize)]
struct OutdatedEntry {
    current: Option<String>,
    wanted: Option<String>,
    latest: Option<String>,
}

/// Runs `npm outdated --json` in `root` and converts the result.
///
/// npm exits with code 1 whenever outdated packages exist; that is the
/// expected case, not a failure. A missing npm binary or unparsable
/// output is a [`CheckError`].
pub fn check_outdated(root: &Path) -> Result<CheckOutcome, CheckError> {
    let output = Command::new("npm")
        .arg("outdated")
        .arg("--json")
        .current_dir(root)
        .output()
        .map_err(|source| CheckError::CommandLaunch {
            command: "npm outdated --json".to_string(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    findings_from_output(&stdout)
}

/// Parses npm's JSON output into findings. Empty output means everything
/// is current.
fn findings_from_output(stdout: &str) -> Result<CheckOutcome, CheckError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(CheckOutcome::default());
    }

    // BTreeMap for a stable findings order.
    let entries: BTreeMap<String, OutdatedEntry> =
        serde_json::from_str(trimmed).map_err(|source| CheckError::CommandOutput {
            command: "npm outdated --json".to_string(),
            source,
        })?;

    let mut outcome = CheckOutcome::default();
    for (name, entry) in entries {
        let current = entry.current.as_deref().unwrap_or("not installed");
        let latest = match entry.latest.as_deref() {
            Some(latest) => latest,
            None => {
                outcome
                    .warnings
                    .push(format!("npm reported no latest version for {}", name));
                continue;
            }
        };

        let severity = if is_major_bump(current, latest) {
            Severity::High
        } else {
            Severity::Medium
        };

        let mut finding = Finding::new(
            Category::Outdated,
            &name,
            severity,
            format!("current {}, latest {}", current, latest),
        )
        .with_metadata("current", current)
        .with_metadata("latest", latest);
        if let Some(wanted) = &entry.wanted {
            finding = finding.with_metadata("wanted", wanted);
        }
        outcome.findings.push(finding);
    }

    Ok(outcome)
}

/// True when the latest version changes the major component (or the
/// current version is unknown).
fn is_major_bump(current: &str, latest: &str) -> bool {
    match (major_component(current), major_component(latest)) {
        (Some(current_major), Some(latest_major)) => latest_major > current_major,
        _ => true,
    }
}

/// Leading numeric component of a version string ("18.2.0" -> 18).
fn major_component(version: &str) -> Option<u64> {
    version
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .split('.')
        .next()?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_component() {
        assert_eq!(major_component("18.2.0"), Some(18));
        assert_eq!(major_component("v2.0.0"), Some(2));
        assert_eq!(major_component("garbage"), None);
    }

    #[test]
    fn test_is_major_bump() {
        assert!(is_major_bump("1.9.9", "2.0.0"));
        assert!(!is_major_bump("1.2.3", "1.9.0"));
        assert!(is_major_bump("not installed", "3.0.0"));
    }

    #[test]
    fn test_empty_output_means_current() {
        let outcome = findings_from_output("").unwrap();
        assert!(outcome.findings.is_empty());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_parses_npm_output() {
        let stdout = r#"{
            "react": {"current": "17.0.2", "wanted": "17.0.2", "latest": "18.2.0"},
            "lodash": {"current": "4.17.20", "wanted": "4.17.21", "latest": "4.17.21"}
        }"#;

        let outcome = findings_from_output(stdout).unwrap();
        assert_eq!(outcome.findings.len(), 2);

        let react = outcome
            .findings
            .iter()
            .find(|f| f.package == "react")
            .unwrap();
        assert_eq!(react.category, Category::Outdated);
        assert_eq!(react.severity, Severity::High);
        assert!(react.message.contains("18.2.0"));

        let lodash = outcome
            .findings
            .iter()
            .find(|f| f.package == "lodash")
            .unwrap();
        assert_eq!(lodash.severity, Severity::Medium);
        assert_eq!(
            lodash.metadata.get("wanted").map(String::as_str),
            Some("4.17.21")
        );
    }

    #[test]
    fn test_unparsable_output_is_an_error() {
        let result = findings_from_output("npm ERR! something broke");
        assert!(matches!(result, Err(CheckError::CommandOutput { .. })));
    }

    #[test]
    fn test_missing_latest_warns_instead_of_failing() {
        let stdout = r#"{"weird": {"current": "1.0.0"}}"#;
        let outcome = findings_from_output(stdout).unwrap();
        assert!(outcome.findings.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
    }
}
