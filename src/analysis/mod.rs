//! Unused-dependency analysis for depscope.
//!
//! The pieces compose one way: the [`usage`] resolver decides whether each
//! declared package is referenced anywhere in source, the
//! [`infrastructure`] classifier rescues known tooling packages from the
//! unused bucket, and the [`unused`] detector orchestrates a full run and
//! emits findings.
//!
//! # Example
//!
//! ```ignore
//! use depscope::analysis::UnusedDetector;
//! use depscope::report::Reporter;
//! use depscope::scan::LocatorConfig;
//!
//! let mut detector = UnusedDetector::new();
//! let mut reporter = Reporter::new();
//! let report = detector.run(&LocatorConfig::new("."), &mut reporter)?;
//! reporter.render();
//! ```

pub mod infrastructure;
pub mod unused;
pub mod usage;

// Re-export main types for convenience
pub use unused::{UnusedDetector, UnusedReport, UnusedSummary};
pub use usage::{reference_satisfies, UsageResolver};
