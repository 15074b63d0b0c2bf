//! JSON export of findings.
//!
//! Serializes the accumulated findings plus summary counts for
//! machine-readable output (`--format json`).

use std::io::{self, Write};

use serde::Serialize;

use super::{Finding, Severity};

/// Project info for JSON output.
#[derive(Serialize)]
struct JsonProject {
    name: String,
    version: String,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    high: usize,
    medium: usize,
    low: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonReport<'a> {
    project: JsonProject,
    summary: JsonSummary,
    findings: &'a [Finding],
}

/// Writes the findings as pretty-printed JSON.
pub fn export<W: Write>(
    project_name: &str,
    project_version: &str,
    findings: &[Finding],
    writer: &mut W,
) -> io::Result<()> {
    let count = |severity: Severity| findings.iter().filter(|f| f.severity == severity).count();

    let report = JsonReport {
        project: JsonProject {
            name: project_name.to_string(),
            version: project_version.to_string(),
        },
        summary: JsonSummary {
            total: findings.len(),
            high: count(Severity::High),
            medium: count(Severity::Medium),
            low: count(Severity::Low),
        },
        findings,
    };

    let json = serde_json::to_string_pretty(&report).map_err(io::Error::other)?;
    writeln!(writer, "{}", json)
}
