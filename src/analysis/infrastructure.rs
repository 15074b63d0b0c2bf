//! Classification of infrastructure packages.
//!
//! Some dependencies are never imported in application source yet the
//! project cannot function without them: compilers, bundlers, test
//! runners, linters, type-declaration packages. Flagging those as dead
//! code would be noise, so the unused-package detector consults this
//! table before calling a package truly unused.
//!
//! The classifier is only ever consulted on the unused branch; it never
//! overrides a "used" verdict.

/// Well-known tooling packages and why they are expected to go unimported.
static INFRASTRUCTURE_PACKAGES: &[(&str, &str)] = &[
    ("typescript", "TypeScript compiler, invoked via tsc"),
    ("webpack", "Bundler, invoked via the webpack CLI"),
    ("webpack-cli", "Bundler CLI entry point"),
    ("webpack-dev-server", "Development server for webpack"),
    ("vite", "Bundler and dev server, invoked via the vite CLI"),
    ("rollup", "Bundler, invoked via the rollup CLI"),
    ("esbuild", "Bundler, invoked via the esbuild CLI"),
    ("parcel", "Bundler, invoked via the parcel CLI"),
    ("@babel/core", "Babel compiler core, loaded by build tooling"),
    ("@babel/cli", "Babel CLI entry point"),
    ("@babel/preset-env", "Babel preset, referenced from babel config"),
    ("babel-loader", "Webpack loader, referenced from webpack config"),
    ("ts-loader", "Webpack loader for TypeScript"),
    ("ts-node", "TypeScript execution engine, invoked via ts-node"),
    ("tsx", "TypeScript execution engine, invoked via tsx"),
    ("jest", "Test framework, invoked via the jest CLI"),
    ("ts-jest", "Jest transformer, referenced from jest config"),
    ("vitest", "Test framework, invoked via the vitest CLI"),
    ("mocha", "Test framework, invoked via the mocha CLI"),
    ("chai", "Assertion library loaded by test tooling"),
    ("cypress", "End-to-end test runner, invoked via the cypress CLI"),
    ("playwright", "End-to-end test runner, invoked via the playwright CLI"),
    ("eslint", "Linter, invoked via the eslint CLI"),
    ("prettier", "Formatter, invoked via the prettier CLI"),
    ("stylelint", "Style linter, invoked via the stylelint CLI"),
    ("husky", "Git hooks manager, wired through package scripts"),
    ("lint-staged", "Pre-commit runner, wired through git hooks"),
    ("nodemon", "Process reloader, invoked via the nodemon CLI"),
    ("concurrently", "Script runner, wired through package scripts"),
    ("cross-env", "Environment helper, wired through package scripts"),
    ("rimraf", "Cleanup helper, wired through package scripts"),
    ("npm-run-all", "Script runner, wired through package scripts"),
    ("tailwindcss", "CSS framework, referenced from its own config"),
    ("postcss", "CSS processor, referenced from postcss config"),
    ("autoprefixer", "PostCSS plugin, referenced from postcss config"),
];

/// Scope prefix for type-declaration packages; anything under it is
/// infrastructure even when not individually listed above.
const TYPES_SCOPE_PREFIX: &str = "@types/";

/// Classifies a package name, returning the justification string when the
/// package is infrastructure and `None` when it is a candidate for a
/// truly-unused finding.
///
/// # Example
///
/// ```
/// use depscope::analysis::infrastructure::classify;
///
/// assert!(classify("typescript").is_some());
/// assert!(classify("@types/node").is_some());
/// assert!(classify("left-pad").is_none());
/// ```
pub fn classify(package: &str) -> Option<&'static str> {
    if let Some((_, reason)) = INFRASTRUCTURE_PACKAGES
        .iter()
        .find(|(name, _)| *name == package)
    {
        return Some(reason);
    }

    if package.starts_with(TYPES_SCOPE_PREFIX) {
        return Some("Type declarations, consumed by the TypeScript compiler");
    }

    None
}
