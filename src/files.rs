//! File inclusion for prompt context
//!
//! Explicit `--file` paths and `--include` glob patterns are expanded,
//! deduplicated preserving order, and prepended to the query as
//! `<file path="...">` blocks. Unreadable files are skipped; the query is
//! still sent.

use anyhow::{Context, Result};
use globset::{Glob, GlobSetBuilder};
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Load and format all requested files, searching globs under `base`.
///
/// Explicit paths come first in the given order, then glob matches in
/// sorted order. Duplicates (by canonical path) are included once.
///
/// # Errors
///
/// Returns an error only for an invalid glob pattern; missing or
/// unreadable files are silently skipped.
pub fn load_files(
    file_paths: &[PathBuf],
    include_patterns: &[String],
    base: &Path,
) -> Result<String> {
    let mut all_paths: Vec<PathBuf> = file_paths
        .iter()
        .filter(|p| p.is_file())
        .cloned()
        .collect();

    if !include_patterns.is_empty() {
        all_paths.extend(expand_globs(include_patterns, base)?);
    }

    let mut seen = HashSet::new();
    let mut blocks = Vec::new();
    for path in all_paths {
        let key = path.canonicalize().unwrap_or_else(|_| path.clone());
        if !seen.insert(key) {
            continue;
        }
        if let Ok(bytes) = std::fs::read(&path) {
            blocks.push(format_file_block(&path, &String::from_utf8_lossy(&bytes)));
        }
    }

    Ok(blocks.join("\n\n"))
}

/// Build the final prompt: file blocks (if any), a blank line, the query.
///
/// # Errors
///
/// Returns an error for an invalid glob pattern.
pub fn build_prompt_with_files(
    query: &str,
    file_paths: &[PathBuf],
    include_patterns: &[String],
    base: &Path,
) -> Result<String> {
    let files_content = load_files(file_paths, include_patterns, base)?;
    if files_content.is_empty() {
        Ok(query.to_string())
    } else {
        Ok(format!("{files_content}\n\n{query}"))
    }
}

fn expand_globs(patterns: &[String], base: &Path) -> Result<Vec<PathBuf>> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(
            Glob::new(pattern).with_context(|| format!("invalid include pattern {pattern:?}"))?,
        );
    }
    let set = builder.build().context("failed to compile include patterns")?;

    let mut matches = Vec::new();
    // Walk everything under base; include patterns are explicit opt-ins,
    // so gitignore rules and hidden-file filtering do not apply.
    for entry in WalkBuilder::new(base)
        .standard_filters(false)
        .build()
        .flatten()
    {
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let relative = entry.path().strip_prefix(base).unwrap_or(entry.path());
        if set.is_match(relative) {
            matches.push(entry.path().to_path_buf());
        }
    }
    matches.sort();
    Ok(matches)
}

fn format_file_block(path: &Path, content: &str) -> String {
    format!("<file path=\"{}\">\n{}\n</file>", path.display(), content)
}
