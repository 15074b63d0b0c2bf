//! Reader for npm package.json manifests.
//!
//! This module loads the dependency declarations (production, development,
//! peer, optional) from a project's package.json into the normalized forms
//! consumed by the detectors.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::types::{Dependency, DependencyKind, PackageJson};

/// Errors that can occur while loading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// No package.json exists at the expected location.
    #[error("No package.json found at {}", .0.display())]
    NotFound(PathBuf),

    /// The manifest exists but could not be read from disk.
    #[error("Failed to read package.json: {0}")]
    Io(#[from] std::io::Error),

    /// The manifest exists but is not well-formed JSON.
    #[error("Failed to parse package.json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type alias for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Loads the package.json from the given project root.
///
/// Fails with [`ManifestError::NotFound`] when the file does not exist and
/// [`ManifestError::Parse`] when it is not well-formed JSON. Both are fatal
/// for an analysis run and are surfaced once at the CLI boundary.
pub fn load(root: &Path) -> ManifestResult<PackageJson> {
    let path = root.join("package.json");
    if !path.is_file() {
        return Err(ManifestError::NotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    parse_str(&content)
}

/// Parses a package.json from a string.
///
/// # Example
///
/// ```
/// use depscope::manifest::parse_str;
///
/// let json = r#"{"name": "my-app", "version": "1.0.0"}"#;
/// let pkg = parse_str(json).unwrap();
/// assert_eq!(pkg.name, Some("my-app".to_string()));
/// ```
pub fn parse_str(content: &str) -> ManifestResult<PackageJson> {
    let pkg: PackageJson = serde_json::from_str(content)?;
    Ok(pkg)
}

/// Reads the project's dependency declarations as one flat
/// name -> version-range map merging all four dependency groups.
///
/// This is the form the unused-package detector consumes: it treats every
/// declared package the same way regardless of group.
pub fn read_dependencies(root: &Path) -> ManifestResult<HashMap<String, String>> {
    Ok(load(root)?.merged_dependencies())
}

/// Extracts all dependencies from a PackageJson into a normalized list
/// with their kinds tagged.
///
/// # Example
///
/// ```
/// use depscope::manifest::{parse_str, extract_dependencies, DependencyKind};
///
/// let json = r#"{
///     "name": "my-app",
///     "dependencies": {"react": "^18.0.0"},
///     "devDependencies": {"typescript": "^5.0.0"}
/// }"#;
///
/// let pkg = parse_str(json).unwrap();
/// let deps = extract_dependencies(&pkg);
///
/// assert_eq!(deps.len(), 2);
/// assert!(deps.iter().any(|d| d.name == "react" && d.kind == DependencyKind::Production));
/// ```
pub fn extract_dependencies(pkg: &PackageJson) -> Vec<Dependency> {
    let mut deps = Vec::new();

    if let Some(ref dependencies) = pkg.dependencies {
        for (name, version) in dependencies {
            deps.push(Dependency::new(name, version, DependencyKind::Production));
        }
    }

    if let Some(ref dev_dependencies) = pkg.dev_dependencies {
        for (name, version) in dev_dependencies {
            deps.push(Dependency::new(name, version, DependencyKind::Development));
        }
    }

    if let Some(ref peer_dependencies) = pkg.peer_dependencies {
        for (name, version) in peer_dependencies {
            deps.push(Dependency::new(name, version, DependencyKind::Peer));
        }
    }

    if let Some(ref optional_dependencies) = pkg.optional_dependencies {
        for (name, version) in optional_dependencies {
            deps.push(Dependency::new(name, version, DependencyKind::Optional));
        }
    }

    deps
}

/// Extracts only the dependencies that ship in a production bundle.
///
/// Used by the heavy-package check, which has no business flagging
/// dev-only tooling for its download size.
pub fn extract_bundled_dependencies(pkg: &PackageJson) -> Vec<Dependency> {
    extract_dependencies(pkg)
        .into_iter()
        .filter(|d| d.kind.affects_bundle_size())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE_PACKAGE_JSON: &str = r#"{
        "name": "test-app",
        "version": "1.0.0",
        "description": "A test application",
        "dependencies": {
            "react": "^18.2.0",
            "react-dom": "^18.2.0",
            "lodash": "^4.17.21"
        },
        "devDependencies": {
            "typescript": "^5.0.0",
            "jest": "^29.0.0"
        },
        "peerDependencies": {
            "react": ">=16.8.0"
        },
        "optionalDependencies": {
            "fsevents": "^2.3.0"
        }
    }"#;

    #[test]
    fn test_parse_str_valid() {
        let pkg = parse_str(SAMPLE_PACKAGE_JSON).unwrap();

        assert_eq!(pkg.name, Some("test-app".to_string()));
        assert_eq!(pkg.version, Some("1.0.0".to_string()));
        assert_eq!(pkg.description, Some("A test application".to_string()));
    }

    #[test]
    fn test_parse_str_invalid_json() {
        let json = "{ invalid json }";
        let result = parse_str(json);

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ManifestError::Parse(_)));
    }

    #[test]
    fn test_load_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let result = load(dir.path());

        assert!(matches!(result.unwrap_err(), ManifestError::NotFound(_)));
    }

    #[test]
    fn test_load_malformed_manifest() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("package.json"), "not json at all").unwrap();

        let result = load(dir.path());
        assert!(matches!(result.unwrap_err(), ManifestError::Parse(_)));
    }

    #[test]
    fn test_read_dependencies_merges_groups() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("package.json"), SAMPLE_PACKAGE_JSON).unwrap();

        let deps = read_dependencies(dir.path()).unwrap();

        // react appears in two groups but collapses to one merged entry:
        // react, react-dom, lodash, typescript, jest, fsevents = 6
        assert_eq!(deps.len(), 6);
        assert!(deps.contains_key("react"));
        assert!(deps.contains_key("jest"));
        assert!(deps.contains_key("fsevents"));
    }

    #[test]
    fn test_extract_dependencies_all_kinds() {
        let pkg = parse_str(SAMPLE_PACKAGE_JSON).unwrap();
        let deps = extract_dependencies(&pkg);

        // 3 prod + 2 dev + 1 peer + 1 optional = 7
        assert_eq!(deps.len(), 7);

        let prod_count = deps
            .iter()
            .filter(|d| d.kind == DependencyKind::Production)
            .count();
        assert_eq!(prod_count, 3);

        let dev_count = deps
            .iter()
            .filter(|d| d.kind == DependencyKind::Development)
            .count();
        assert_eq!(dev_count, 2);
    }

    #[test]
    fn test_extract_bundled_dependencies() {
        let pkg = parse_str(SAMPLE_PACKAGE_JSON).unwrap();
        let deps = extract_bundled_dependencies(&pkg);

        // 3 prod + 1 optional
        assert_eq!(deps.len(), 4);
        assert!(deps.iter().all(|d| d.kind.affects_bundle_size()));
    }

    #[test]
    fn test_parse_str_with_extra_fields() {
        // package.json often has many other fields; ensure we ignore them gracefully
        let json = r#"{
            "name": "with-extras",
            "version": "1.0.0",
            "scripts": {"build": "tsc"},
            "author": "Test Author",
            "license": "MIT",
            "repository": {"type": "git", "url": "https://example.com"},
            "dependencies": {"express": "^4.18.0"}
        }"#;

        let pkg = parse_str(json).unwrap();
        assert_eq!(pkg.name, Some("with-extras".to_string()));
        assert_eq!(pkg.dependencies.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_manifest_error_display() {
        let err = ManifestError::NotFound(PathBuf::from("/nowhere/package.json"));
        assert!(err.to_string().contains("No package.json found"));
    }
}
