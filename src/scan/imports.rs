//! Import extraction using tree-sitter for JavaScript/TypeScript.
//!
//! This module scans source files for the literal module-path operands of
//! static `import` statements, CommonJS `require()` calls and dynamic
//! `import()` calls. Paths are kept as the verbatim quoted text; nothing is
//! resolved against the filesystem.
//!
//! This is a lexical scan, not a semantic one: a module load whose path is
//! built from a variable or expression is invisible here. That is an
//! accepted limitation of static analysis, not a bug.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tree_sitter::{Node, Parser, Tree, TreeCursor};

/// Errors that can occur during import extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse file: {path}")]
    ParseError { path: String },

    #[error("Tree-sitter language initialization failed")]
    LanguageInit,
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Language grammar to parse a file with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    JavaScript,
    TypeScript,
    Tsx,
}

impl SourceLanguage {
    /// Determine the grammar from a file extension.
    ///
    /// Markup-ish single-file-component formats (.vue, .svelte) fall back to
    /// the JavaScript grammar; tree-sitter's error recovery still surfaces
    /// the import statements inside their script blocks.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "ts" | "mts" | "cts" => SourceLanguage::TypeScript,
            "tsx" => SourceLanguage::Tsx,
            _ => SourceLanguage::JavaScript,
        }
    }
}

/// Extracts literal import paths from source files, memoizing per file path.
///
/// The cache is run-scoped: the unused-package detector calls [`reset`]
/// exactly once at the start of each analysis run. Without the cache, the
/// same file would be re-read and re-parsed once per candidate package,
/// making the whole scan quadratic in (files x packages).
///
/// [`reset`]: ImportExtractor::reset
pub struct ImportExtractor {
    js_parser: Parser,
    ts_parser: Parser,
    tsx_parser: Parser,
    cache: HashMap<PathBuf, Arc<Vec<String>>>,
    warnings: Vec<String>,
}

impl ImportExtractor {
    /// Create a new ImportExtractor.
    pub fn new() -> ExtractResult<Self> {
        let mut js_parser = Parser::new();
        js_parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|_| ExtractError::LanguageInit)?;

        let mut ts_parser = Parser::new();
        ts_parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .map_err(|_| ExtractError::LanguageInit)?;

        let mut tsx_parser = Parser::new();
        tsx_parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TSX.into())
            .map_err(|_| ExtractError::LanguageInit)?;

        Ok(Self {
            js_parser,
            ts_parser,
            tsx_parser,
            cache: HashMap::new(),
            warnings: Vec::new(),
        })
    }

    /// Clears the per-file cache and accumulated warnings.
    ///
    /// Must be called at the start of each top-level analysis run; cached
    /// results are not safe to reuse across runs where files may have changed.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.warnings.clear();
    }

    /// Drains the warnings accumulated since the last reset.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// Extracts the literal import paths from a file, computing at most once
    /// per path per run.
    ///
    /// A file that cannot be read or parsed contributes zero references and
    /// a warning; it never fails the run.
    pub fn extract(&mut self, path: &Path) -> Arc<Vec<String>> {
        if let Some(cached) = self.cache.get(path) {
            return Arc::clone(cached);
        }

        let imports = match self.extract_uncached(path) {
            Ok(imports) => imports,
            Err(err) => {
                self.warnings
                    .push(format!("Failed to analyze {}: {}", path.display(), err));
                Vec::new()
            }
        };

        let imports = Arc::new(imports);
        self.cache.insert(path.to_path_buf(), Arc::clone(&imports));
        imports
    }

    fn extract_uncached(&mut self, path: &Path) -> ExtractResult<Vec<String>> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let language = SourceLanguage::from_extension(ext);
        let content = fs::read_to_string(path)?;
        self.extract_source(&content, language, path)
    }

    /// Extracts import paths from source text directly.
    pub fn extract_source(
        &mut self,
        source: &str,
        language: SourceLanguage,
        path: &Path,
    ) -> ExtractResult<Vec<String>> {
        let parser = match language {
            SourceLanguage::JavaScript => &mut self.js_parser,
            SourceLanguage::TypeScript => &mut self.ts_parser,
            SourceLanguage::Tsx => &mut self.tsx_parser,
        };

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ExtractError::ParseError {
                path: path.display().to_string(),
            })?;

        Ok(collect_import_paths(&tree, source))
    }
}

/// Walks a parsed tree collecting every literal import path.
fn collect_import_paths(tree: &Tree, source: &str) -> Vec<String> {
    let mut paths = Vec::new();
    let mut cursor = tree.root_node().walk();
    visit_node(&mut cursor, source, &mut paths);
    paths
}

/// Recursively visit nodes to find import statements and load calls.
fn visit_node(cursor: &mut TreeCursor, source: &str, paths: &mut Vec<String>) {
    let node = cursor.node();

    match node.kind() {
        "import_statement" => {
            // Covers default, named, namespace and side-effect forms;
            // only the quoted source operand matters here.
            if let Some(path) = import_statement_source(&node, source) {
                paths.push(path);
            }
        }
        "export_statement" => {
            // Re-exports (`export { x } from 'pkg'`) reference a module too.
            if let Some(path) = import_statement_source(&node, source) {
                paths.push(path);
            }
        }
        "call_expression" => {
            if let Some(path) = require_or_dynamic_import_source(&node, source) {
                paths.push(path);
            }
        }
        _ => {}
    }

    if cursor.goto_first_child() {
        loop {
            visit_node(cursor, source, paths);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }
}

/// Pulls the quoted module path out of an import/export statement.
fn import_statement_source(node: &Node, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "string" {
            return literal_string_value(&child, source);
        }
    }
    None
}

/// Pulls the quoted module path out of `require('...')` or `import('...')`.
///
/// Only calls whose sole path argument is a string literal (or a
/// substitution-free template literal) are visible; anything computed
/// yields `None`.
fn require_or_dynamic_import_source(node: &Node, source: &str) -> Option<String> {
    let func_node = node.child_by_field_name("function")?;
    let func_name = node_text(&func_node, source)?;

    if func_name != "require" && func_name != "import" {
        return None;
    }

    let args_node = node.child_by_field_name("arguments")?;
    let mut cursor = args_node.walk();
    for child in args_node.children(&mut cursor) {
        match child.kind() {
            "string" => return literal_string_value(&child, source),
            "template_string" => return template_string_value(&child, source),
            _ => {}
        }
    }

    None
}

/// Extract the text content of a node.
fn node_text<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    source.get(node.start_byte()..node.end_byte())
}

/// Extract a plain string literal's value (removes the quotes).
fn literal_string_value(node: &Node, source: &str) -> Option<String> {
    let text = node_text(node, source)?;
    let trimmed = text
        .trim_start_matches(['"', '\''])
        .trim_end_matches(['"', '\'']);
    Some(trimmed.to_string())
}

/// Extract a back-tick literal's value, rejecting any template with
/// substitutions (those are computed paths, invisible to this scan).
fn template_string_value(node: &Node, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "template_substitution" {
            return None;
        }
    }
    let text = node_text(node, source)?;
    Some(text.trim_matches('`').to_string())
}

impl Default for ImportExtractor {
    fn default() -> Self {
        Self::new().expect("Failed to initialize ImportExtractor")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse_source(source: &str) -> Vec<String> {
        let mut extractor = ImportExtractor::new().unwrap();
        extractor
            .extract_source(source, SourceLanguage::JavaScript, Path::new("test.js"))
            .unwrap()
    }

    fn parse_ts_source(source: &str) -> Vec<String> {
        let mut extractor = ImportExtractor::new().unwrap();
        extractor
            .extract_source(source, SourceLanguage::TypeScript, Path::new("test.ts"))
            .unwrap()
    }

    // ===== ES6 Import Tests =====

    #[test]
    fn test_default_import() {
        let paths = parse_source(r#"import React from 'react';"#);
        assert_eq!(paths, vec!["react"]);
    }

    #[test]
    fn test_named_imports() {
        let paths = parse_source(r#"import { useState, useEffect } from 'react';"#);
        assert_eq!(paths, vec!["react"]);
    }

    #[test]
    fn test_namespace_import() {
        let paths = parse_source(r#"import * as _ from 'lodash';"#);
        assert_eq!(paths, vec!["lodash"]);
    }

    #[test]
    fn test_side_effect_import() {
        let paths = parse_source(r#"import './styles.css';"#);
        assert_eq!(paths, vec!["./styles.css"]);
    }

    #[test]
    fn test_double_quoted_import() {
        let paths = parse_source(r#"import axios from "axios";"#);
        assert_eq!(paths, vec!["axios"]);
    }

    #[test]
    fn test_subpath_import_kept_verbatim() {
        let paths = parse_source(r#"import debounce from 'lodash/debounce';"#);
        assert_eq!(paths, vec!["lodash/debounce"]);
    }

    #[test]
    fn test_reexport_statement() {
        let paths = parse_source(r#"export { format } from 'date-fns';"#);
        assert_eq!(paths, vec!["date-fns"]);
    }

    // ===== CommonJS Tests =====

    #[test]
    fn test_require_simple() {
        let paths = parse_source(r#"const React = require('react');"#);
        assert_eq!(paths, vec!["react"]);
    }

    #[test]
    fn test_require_without_assignment() {
        let paths = parse_source(r#"require('./polyfills');"#);
        assert_eq!(paths, vec!["./polyfills"]);
    }

    #[test]
    fn test_require_backtick_literal() {
        let paths = parse_source(r#"const _ = require(`lodash`);"#);
        assert_eq!(paths, vec!["lodash"]);
    }

    #[test]
    fn test_require_computed_path_invisible() {
        let source = r#"
            const name = 'react';
            const a = require(name);
            const b = require(`./locales/${lang}`);
            const c = require('path' + suffix);
        "#;
        let paths = parse_source(source);
        assert!(paths.is_empty());
    }

    // ===== Dynamic Import Tests =====

    #[test]
    fn test_dynamic_import() {
        let paths = parse_source(r#"const mod = await import('lodash');"#);
        assert_eq!(paths, vec!["lodash"]);
    }

    // ===== TypeScript Tests =====

    #[test]
    fn test_typescript_type_import() {
        let paths = parse_ts_source(r#"import type { FC } from 'react';"#);
        assert_eq!(paths, vec!["react"]);
    }

    #[test]
    fn test_tsx_source() {
        let mut extractor = ImportExtractor::new().unwrap();
        let source = r#"
import React from 'react';
export const App = () => <div>hello</div>;
"#;
        let paths = extractor
            .extract_source(source, SourceLanguage::Tsx, Path::new("app.tsx"))
            .unwrap();
        assert_eq!(paths, vec!["react"]);
    }

    // ===== Multiple Statements =====

    #[test]
    fn test_multiple_imports() {
        let source = r#"
import React from 'react';
import { useQuery } from '@tanstack/react-query';
const axios = require("axios");
import './styles.css';
"#;
        let paths = parse_source(source);
        assert_eq!(paths.len(), 4);
        assert!(paths.contains(&"react".to_string()));
        assert!(paths.contains(&"@tanstack/react-query".to_string()));
        assert!(paths.contains(&"axios".to_string()));
        assert!(paths.contains(&"./styles.css".to_string()));
    }

    // ===== Cache Behavior =====

    #[test]
    fn test_extract_is_memoized_per_path() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("index.js");
        fs::write(&file, "import React from 'react';").unwrap();

        let mut extractor = ImportExtractor::new().unwrap();
        let first = extractor.extract(&file);
        assert_eq!(*first, vec!["react".to_string()]);

        // Changing the file on disk must not change the cached result
        // within the same run.
        fs::write(&file, "import axios from 'axios';").unwrap();
        let second = extractor.extract(&file);
        assert_eq!(*second, vec!["react".to_string()]);

        // After a reset, the file is re-read.
        extractor.reset();
        let third = extractor.extract(&file);
        assert_eq!(*third, vec!["axios".to_string()]);
    }

    #[test]
    fn test_unreadable_file_warns_and_yields_empty() {
        let mut extractor = ImportExtractor::new().unwrap();
        let paths = extractor.extract(Path::new("/no/such/file.js"));

        assert!(paths.is_empty());
        let warnings = extractor.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("file.js"));
    }
}
