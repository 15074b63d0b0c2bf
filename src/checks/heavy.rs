//! Heavy-package check, backed by the bundlephobia size API.
//!
//! Looks up the bundled size of every production dependency and flags the
//! ones whose gzipped size crosses the configured thresholds. Lookups run
//! in small batches with a pause between batches out of courtesy to the
//! service's rate limits; a failed lookup for one package is a warning,
//! never a failed run.

use std::path::Path;
use std::thread;
use std::time::Duration;

use serde::Deserialize;

use super::{CheckError, CheckOutcome};
use crate::manifest::{self, Dependency};
use crate::report::{Category, Finding, Severity};

const SIZE_API_URL: &str = "https://bundlephobia.com/api/size";

/// Thresholds and pacing for the heavy-package check.
#[derive(Debug, Clone)]
pub struct HeavyConfig {
    /// Gzipped size above which a package is flagged at medium severity.
    pub warn_bytes: u64,
    /// Gzipped size above which the severity escalates to high.
    pub high_bytes: u64,
    /// Lookups issued per batch.
    pub batch_size: usize,
    /// Pause between batches.
    pub batch_delay: Duration,
}

impl Default for HeavyConfig {
    fn default() -> Self {
        Self {
            warn_bytes: 100 * 1024,
            high_bytes: 500 * 1024,
            batch_size: 5,
            batch_delay: Duration::from_millis(300),
        }
    }
}

/// Size data returned by the bundlephobia API.
#[derive(Debug, Deserialize)]
struct SizeInfo {
    /// Minified size in bytes.
    size: u64,
    /// Minified + gzipped size in bytes.
    gzip: u64,
}

/// Looks up bundle sizes for the project's production and optional
/// dependencies and flags the heavy ones.
pub fn check_heavy(root: &Path, config: &HeavyConfig) -> Result<CheckOutcome, CheckError> {
    let pkg = manifest::load(root)?;
    let deps = manifest::extract_bundled_dependencies(&pkg);
    if deps.is_empty() {
        return Ok(CheckOutcome::default());
    }

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("depscope/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(10))
        .build()?;

    let mut outcome = CheckOutcome::default();
    for (batch_index, batch) in deps.chunks(config.batch_size.max(1)).enumerate() {
        if batch_index > 0 {
            thread::sleep(config.batch_delay);
        }
        for dep in batch {
            match lookup_size(&client, dep) {
                Ok(info) => {
                    if let Some(finding) = finding_for(dep, &info, config) {
                        outcome.findings.push(finding);
                    }
                }
                Err(reason) => outcome
                    .warnings
                    .push(format!("Size lookup failed for {}: {}", dep.name, reason)),
            }
        }
    }

    // Largest offenders first.
    outcome.findings.sort_by(|a, b| b.severity.cmp(&a.severity));
    Ok(outcome)
}

/// Queries the size API for one package.
fn lookup_size(client: &reqwest::blocking::Client, dep: &Dependency) -> Result<SizeInfo, String> {
    let spec = format!("{}@{}", dep.name, normalize_range(&dep.version));
    let response = client
        .get(SIZE_API_URL)
        .query(&[("package", spec.as_str())])
        .send()
        .map_err(|e| e.to_string())?;

    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }
    response.json::<SizeInfo>().map_err(|e| e.to_string())
}

/// Strips range operators so the API gets a concrete-looking version
/// ("^18.2.0" -> "18.2.0"). Complex ranges pass through as-is; the API
/// resolves what it can.
fn normalize_range(range: &str) -> &str {
    range.trim_start_matches(['^', '~', '=', 'v']).trim()
}

/// Builds a finding when the gzipped size crosses a threshold.
fn finding_for(dep: &Dependency, info: &SizeInfo, config: &HeavyConfig) -> Option<Finding> {
    let severity = if info.gzip >= config.high_bytes {
        Severity::High
    } else if info.gzip >= config.warn_bytes {
        Severity::Medium
    } else {
        return None;
    };

    Some(
        Finding::new(
            Category::Heavy,
            &dep.name,
            severity,
            format!(
                "adds {} gzipped ({} minified) to the bundle",
                format_size(info.gzip),
                format_size(info.size)
            ),
        )
        .with_metadata("gzip_bytes", info.gzip.to_string())
        .with_metadata("size_bytes", info.size.to_string()),
    )
}

/// Formats a byte count for humans ("154.2 KB").
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;

    let bytes = bytes as f64;
    if bytes >= MB {
        format!("{:.1} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{} B", bytes as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::DependencyKind;

    fn dep(name: &str, version: &str) -> Dependency {
        Dependency::new(name, version, DependencyKind::Production)
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(154 * 1024 + 205), "154.2 KB");
        assert_eq!(format_size(2 * 1024 * 1024), "2.0 MB");
    }

    #[test]
    fn test_normalize_range() {
        assert_eq!(normalize_range("^18.2.0"), "18.2.0");
        assert_eq!(normalize_range("~4.17.21"), "4.17.21");
        assert_eq!(normalize_range("1.0.0"), "1.0.0");
        assert_eq!(normalize_range(">=2.0.0"), ">=2.0.0");
    }

    #[test]
    fn test_size_info_deserializes_api_response() {
        // Shape of a real bundlephobia response, extra fields ignored.
        let body = r#"{
            "name": "moment",
            "size": 294359,
            "gzip": 72672,
            "dependencyCount": 0
        }"#;
        let info: SizeInfo = serde_json::from_str(body).unwrap();
        assert_eq!(info.size, 294359);
        assert_eq!(info.gzip, 72672);
    }

    #[test]
    fn test_finding_thresholds() {
        let config = HeavyConfig::default();

        let small = SizeInfo {
            size: 40 * 1024,
            gzip: 12 * 1024,
        };
        assert!(finding_for(&dep("tiny", "^1.0.0"), &small, &config).is_none());

        let medium = SizeInfo {
            size: 400 * 1024,
            gzip: 150 * 1024,
        };
        let finding = finding_for(&dep("chunky", "^1.0.0"), &medium, &config).unwrap();
        assert_eq!(finding.severity, Severity::Medium);
        assert_eq!(finding.category, Category::Heavy);

        let large = SizeInfo {
            size: 3 * 1024 * 1024,
            gzip: 600 * 1024,
        };
        let finding = finding_for(&dep("moment", "^2.29.0"), &large, &config).unwrap();
        assert_eq!(finding.severity, Severity::High);
        assert!(finding.message.contains("gzipped"));
        assert_eq!(
            finding.metadata.get("gzip_bytes").map(String::as_str),
            Some((600 * 1024).to_string().as_str())
        );
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let config = HeavyConfig::default();
        let at_warn = SizeInfo {
            size: 0,
            gzip: config.warn_bytes,
        };
        assert!(finding_for(&dep("edge", "1.0.0"), &at_warn, &config).is_some());
    }
}
