//! Shared types for manifest parsing.
//!
//! This module defines the core data structures used to represent
//! an npm package manifest and its dependency declarations.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Represents the structure of a package.json file.
///
/// This struct mirrors the npm package.json specification,
/// capturing the fields needed for dependency hygiene analysis.
///
/// # Example
///
/// ```
/// use depscope::manifest::PackageJson;
///
/// let json = r#"{"name": "my-app", "version": "1.0.0"}"#;
/// let pkg: PackageJson = serde_json::from_str(json).unwrap();
/// assert_eq!(pkg.name, Some("my-app".to_string()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PackageJson {
    /// The name of the package.
    pub name: Option<String>,

    /// The version of the package (semver format).
    pub version: Option<String>,

    /// A brief description of the package.
    pub description: Option<String>,

    /// Production dependencies required at runtime.
    pub dependencies: Option<HashMap<String, String>>,

    /// Development-only dependencies (testing, building, etc.).
    #[serde(rename = "devDependencies")]
    pub dev_dependencies: Option<HashMap<String, String>>,

    /// Peer dependencies that the host package must provide.
    #[serde(rename = "peerDependencies")]
    pub peer_dependencies: Option<HashMap<String, String>>,

    /// Optional dependencies that enhance functionality if available.
    #[serde(rename = "optionalDependencies")]
    pub optional_dependencies: Option<HashMap<String, String>>,
}

impl PackageJson {
    /// Returns true if the package has any dependencies defined.
    pub fn has_dependencies(&self) -> bool {
        self.dependencies.as_ref().is_some_and(|d| !d.is_empty())
            || self
                .dev_dependencies
                .as_ref()
                .is_some_and(|d| !d.is_empty())
            || self
                .peer_dependencies
                .as_ref()
                .is_some_and(|d| !d.is_empty())
            || self
                .optional_dependencies
                .as_ref()
                .is_some_and(|d| !d.is_empty())
    }

    /// Returns the total count of all dependency declarations.
    pub fn dependency_count(&self) -> usize {
        self.dependencies.as_ref().map_or(0, |d| d.len())
            + self.dev_dependencies.as_ref().map_or(0, |d| d.len())
            + self.peer_dependencies.as_ref().map_or(0, |d| d.len())
            + self.optional_dependencies.as_ref().map_or(0, |d| d.len())
    }

    /// Merges all four dependency groups into one flat name -> version-range map.
    ///
    /// When the same package name appears in more than one group, a single
    /// entry wins; which one is unspecified.
    pub fn merged_dependencies(&self) -> HashMap<String, String> {
        let mut merged = HashMap::with_capacity(self.dependency_count());
        for group in [
            &self.dependencies,
            &self.dev_dependencies,
            &self.peer_dependencies,
            &self.optional_dependencies,
        ]
        .into_iter()
        .flatten()
        {
            for (name, range) in group {
                merged.insert(name.clone(), range.clone());
            }
        }
        merged
    }
}

/// Categorizes the type of dependency relationship.
///
/// Different dependency kinds have different implications for
/// bundle size, deployment, and version resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    /// Production dependencies - required at runtime.
    Production,

    /// Development dependencies - only needed during development.
    Development,

    /// Peer dependencies - expected to be provided by the consumer.
    Peer,

    /// Optional dependencies - enhance functionality if available.
    Optional,
}

impl DependencyKind {
    /// Returns a short label for the dependency kind.
    pub fn label(&self) -> &'static str {
        match self {
            DependencyKind::Production => "prod",
            DependencyKind::Development => "dev",
            DependencyKind::Peer => "peer",
            DependencyKind::Optional => "optional",
        }
    }

    /// Returns true if this dependency kind contributes to production
    /// bundle size (used by the heavy-package check to scope its lookups).
    pub fn affects_bundle_size(&self) -> bool {
        matches!(self, DependencyKind::Production | DependencyKind::Optional)
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DependencyKind::Production => "production",
            DependencyKind::Development => "development",
            DependencyKind::Peer => "peer",
            DependencyKind::Optional => "optional",
        };
        write!(f, "{}", s)
    }
}

/// Represents a single declared dependency with its metadata.
///
/// This is the normalized form used throughout depscope.
#[derive(Debug, Clone)]
pub struct Dependency {
    /// The package name (e.g., "react", "@scope/pkg").
    pub name: String,

    /// The version-range specifier (e.g., "^18.0.0", "~1.2.3").
    pub version: String,

    /// The category of this dependency.
    pub kind: DependencyKind,
}

impl Dependency {
    /// Creates a new Dependency instance.
    pub fn new(name: impl Into<String>, version: impl Into<String>, kind: DependencyKind) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            kind,
        }
    }

}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.name, self.version, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_kind_label() {
        assert_eq!(DependencyKind::Production.label(), "prod");
        assert_eq!(DependencyKind::Development.label(), "dev");
        assert_eq!(DependencyKind::Peer.label(), "peer");
        assert_eq!(DependencyKind::Optional.label(), "optional");
    }

    #[test]
    fn test_dependency_kind_affects_bundle_size() {
        assert!(DependencyKind::Production.affects_bundle_size());
        assert!(!DependencyKind::Development.affects_bundle_size());
        assert!(!DependencyKind::Peer.affects_bundle_size());
        assert!(DependencyKind::Optional.affects_bundle_size());
    }

    #[test]
    fn test_dependency_display() {
        let dep = Dependency::new("lodash", "~4.17.21", DependencyKind::Development);
        assert_eq!(format!("{}", dep), "lodash@~4.17.21 (development)");
    }

    #[test]
    fn test_package_json_default() {
        let pkg = PackageJson::default();
        assert!(pkg.name.is_none());
        assert!(!pkg.has_dependencies());
        assert_eq!(pkg.dependency_count(), 0);
        assert!(pkg.merged_dependencies().is_empty());
    }

    #[test]
    fn test_merged_dependencies_all_groups() {
        let json = r#"{
            "dependencies": {"react": "^18.0.0"},
            "devDependencies": {"typescript": "^5.0.0"},
            "peerDependencies": {"react-dom": ">=16.8.0"},
            "optionalDependencies": {"fsevents": "^2.3.0"}
        }"#;
        let pkg: PackageJson = serde_json::from_str(json).unwrap();
        let merged = pkg.merged_dependencies();

        assert_eq!(merged.len(), 4);
        assert_eq!(merged.get("react").map(String::as_str), Some("^18.0.0"));
        assert_eq!(
            merged.get("typescript").map(String::as_str),
            Some("^5.0.0")
        );
        assert!(merged.contains_key("react-dom"));
        assert!(merged.contains_key("fsevents"));
    }

    #[test]
    fn test_merged_dependencies_collision_single_winner() {
        let json = r#"{
            "dependencies": {"react": "^18.0.0"},
            "peerDependencies": {"react": ">=16.8.0"}
        }"#;
        let pkg: PackageJson = serde_json::from_str(json).unwrap();
        let merged = pkg.merged_dependencies();

        // One entry wins; which one is unspecified.
        assert_eq!(merged.len(), 1);
        let winner = merged.get("react").unwrap();
        assert!(winner == "^18.0.0" || winner == ">=16.8.0");
    }
}
