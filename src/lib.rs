//! depscope - dependency hygiene checker for npm projects
//!
//! This crate inspects a project's package.json and source tree and flags
//! four categories of dependency issues: packages never imported (unused),
//! packages with newer published versions (outdated), packages installed
//! at multiple resolved versions (duplicate), and packages whose bundled
//! size crosses configurable thresholds (heavy).
//!
//! It is a diagnostic tool, not a build system or package manager: nothing
//! here mutates project files.

pub mod analysis;
pub mod checks;
pub mod manifest;
pub mod report;
pub mod scan;
