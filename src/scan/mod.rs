//! Source tree scanning for depscope.
//!
//! Two pieces: the locator walks the project tree collecting source files
//! (pruning dependency-store and build-output directories), and the import
//! extractor pulls the literal module paths out of each file, memoized per
//! path for the duration of a run.

pub mod imports;
pub mod locator;

// Re-export main types for convenience
pub use imports::{ExtractError, ExtractResult, ImportExtractor, SourceLanguage};
pub use locator::{find_source_files, LocatorConfig, ScanOutcome};
