//! Manifest reading for depscope.
//!
//! Loads a project's package.json and normalizes its four dependency
//! groups (production, development, peer, optional) into the flat forms
//! the detectors consume.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use depscope::manifest;
//!
//! // One flat name -> version-range map across all groups
//! let deps = manifest::read_dependencies(Path::new("."))?;
//! println!("{} declared dependencies", deps.len());
//! ```

pub mod package_json;
pub mod types;

// Re-export commonly used items for convenience
pub use package_json::{
    extract_bundled_dependencies, extract_dependencies, load, parse_str, read_dependencies,
    ManifestError, ManifestResult,
};

pub use types::{Dependency, DependencyKind, PackageJson};
