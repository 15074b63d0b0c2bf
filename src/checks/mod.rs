//! Sibling hygiene checks: outdated, duplicate and heavy packages.
//!
//! These are thin wrappers over external tools and services. The outdated
//! and duplicate checks shell out to npm and parse its JSON output; the
//! heavy check queries the bundlephobia size API. None of them affect the
//! unused-package core, and any of them failing degrades to a warning
//! rather than aborting the run.

pub mod duplicates;
pub mod heavy;
pub mod outdated;

use crate::report::Finding;

/// Errors from the external-tool wrappers.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The external command could not be launched at all.
    #[error("Failed to run `{command}`: {source} (is npm installed?)")]
    CommandLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The external command ran but its output was not the expected JSON.
    #[error("`{command}` produced unparsable output: {source}")]
    CommandOutput {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    /// The project manifest could not be loaded.
    #[error(transparent)]
    Manifest(#[from] crate::manifest::ManifestError),

    /// The size-lookup HTTP client could not be constructed.
    #[error("Failed to initialize HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result of one sibling check: its findings plus non-fatal warnings
/// (same result-with-warnings shape as the source tree scan).
#[derive(Debug, Default)]
pub struct CheckOutcome {
    pub findings: Vec<Finding>,
    pub warnings: Vec<String>,
}

pub use duplicates::check_duplicates;
pub use heavy::{check_heavy, HeavyConfig};
pub use outdated::check_outdated;
