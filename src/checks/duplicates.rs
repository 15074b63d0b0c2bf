//! Duplicate-package check, backed by `npm ls --all --json`.
//!
//! Walks the resolved dependency tree npm reports and flags every package
//! that is installed at more than one version. No graph resolution happens
//! here; npm already did it.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::process::Command;

use serde::Deserialize;

use super::{CheckError, CheckOutcome};
use crate::report::{Category, Finding, Severity};

/// One node of the `npm ls --json` tree.
#[derive(Debug, Deserialize)]
struct NpmTreeNode {
    version: Option<String>,
    #[serde(default)]
    dependencies: HashMap<String, NpmTreeNode>,
}

/// Runs `npm ls --all --json` in `root` and flags multi-version packages.
///
/// npm exits non-zero for peer-dependency problems while still printing a
/// usable tree, so the exit code is ignored; only unparsable output fails.
pub fn check_duplicates(root: &Path) -> Result<CheckOutcome, CheckError> {
    let output = Command::new("npm")
        .arg("ls")
        .arg("--all")
        .arg("--json")
        .current_dir(root)
        .output()
        .map_err(|source| CheckError::CommandLaunch {
            command: "npm ls --all --json".to_string(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    findings_from_output(&stdout)
}

fn findings_from_output(stdout: &str) -> Result<CheckOutcome, CheckError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(CheckOutcome::default());
    }

    let root: NpmTreeNode =
        serde_json::from_str(trimmed).map_err(|source| CheckError::CommandOutput {
            command: "npm ls --all --json".to_string(),
            source,
        })?;

    let mut versions: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    collect_versions(&root.dependencies, &mut versions);

    let mut outcome = CheckOutcome::default();
    for (name, resolved) in versions {
        if resolved.len() < 2 {
            continue;
        }
        let list = resolved.iter().cloned().collect::<Vec<_>>().join(", ");
        outcome.findings.push(
            Finding::new(
                Category::Duplicate,
                &name,
                Severity::Low,
                format!("installed at {} versions: {}", resolved.len(), list),
            )
            .with_metadata("versions", list),
        );
    }

    Ok(outcome)
}

/// Recursively records every resolved (name, version) pair in the tree.
fn collect_versions(
    dependencies: &HashMap<String, NpmTreeNode>,
    versions: &mut BTreeMap<String, BTreeSet<String>>,
) {
    for (name, node) in dependencies {
        if let Some(version) = &node.version {
            versions
                .entry(name.clone())
                .or_default()
                .insert(version.clone());
        }
        collect_versions(&node.dependencies, versions);
    }
}
