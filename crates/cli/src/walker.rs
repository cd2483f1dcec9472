// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Lazy depth-first file walking.
//!
//! Uses the `ignore` crate's sequential walker as the underlying iterator,
//! so files are filtered as they are discovered rather than after the whole
//! tree has been listed. Each call to [`FileWalker::walk`] starts a fresh
//! traversal.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;

/// Default maximum directory depth.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Frontend source extensions scanned when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "ts", "jsx", "tsx", "html", "css"];

/// Directories never descended into.
pub(crate) const SKIP_DIRECTORIES: &[&str] = &[".git"];

/// Helper to check if an ignore::Error is a symlink loop error.
fn is_loop_error(err: &ignore::Error) -> bool {
    match err {
        ignore::Error::Loop { .. } => true,
        ignore::Error::WithPath { err, .. } => is_loop_error(err),
        ignore::Error::WithDepth { err, .. } => is_loop_error(err),
        ignore::Error::WithLineNumber { err, .. } => is_loop_error(err),
        _ => false,
    }
}

/// Whether `path` has one of the allowed extensions.
///
/// Extensions are compared without the leading dot and case-sensitively.
pub fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|allowed| allowed.trim_start_matches('.') == ext)
}

/// Walker configuration.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Allowed file extensions (without leading dot).
    pub extensions: Vec<String>,

    /// Glob patterns excluded from the walk.
    pub exclude_patterns: Vec<String>,

    /// Maximum directory depth (default: 100).
    pub max_depth: Option<usize>,

    /// Whether to respect gitignore files.
    pub git_ignore: bool,

    /// Whether to skip hidden files.
    pub skip_hidden: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            exclude_patterns: Vec::new(),
            max_depth: Some(DEFAULT_MAX_DEPTH),
            git_ignore: false,
            skip_hidden: false,
        }
    }
}

/// File discovered by the walker.
#[derive(Debug)]
pub struct WalkedFile {
    /// Path to the file (root joined with the relative path).
    pub path: PathBuf,

    /// File size in bytes.
    pub size: u64,

    /// Directory depth from root.
    pub depth: usize,
}

/// Statistics from a walk operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WalkStats {
    /// Files yielded.
    pub files_found: usize,

    /// Files seen but rejected by the extension filter.
    pub files_filtered: usize,

    /// Symlink loops detected.
    pub symlink_loops: usize,

    /// Errors encountered.
    pub errors: usize,
}

/// Depth-first file walker.
pub struct FileWalker {
    config: WalkerConfig,
}

impl FileWalker {
    /// Create a new walker with the given configuration.
    pub fn new(config: WalkerConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    /// Start a traversal of `root`.
    ///
    /// Nothing is read until the returned iterator is advanced.
    pub fn walk(&self, root: &Path) -> Walk {
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .hidden(self.config.skip_hidden)
            .git_ignore(self.config.git_ignore)
            .follow_links(true)
            .max_depth(self.config.max_depth);

        // Override globs without `!` whitelist; with `!` they exclude.
        if !self.config.exclude_patterns.is_empty() {
            let mut override_builder = OverrideBuilder::new(root);
            for pattern in &self.config.exclude_patterns {
                if let Err(err) = override_builder.add(&format!("!{}", pattern)) {
                    tracing::warn!("ignoring exclude pattern {}: {}", pattern, err);
                }
            }
            match override_builder.build() {
                Ok(overrides) => {
                    builder.overrides(overrides);
                }
                Err(err) => tracing::warn!("ignoring exclude patterns: {}", err),
            }
        }

        builder.filter_entry(|entry| {
            !entry.file_type().map(|t| t.is_dir()).unwrap_or(false)
                || !entry
                    .file_name()
                    .to_str()
                    .map(|name| SKIP_DIRECTORIES.contains(&name))
                    .unwrap_or(false)
        });

        Walk {
            inner: builder.build(),
            extensions: self.config.extensions.clone(),
            stats: WalkStats::default(),
        }
    }
}

/// In-progress traversal yielding matching files.
pub struct Walk {
    inner: ignore::Walk,
    extensions: Vec<String>,
    stats: WalkStats,
}

impl Walk {
    /// Counters accumulated so far.
    pub fn stats(&self) -> &WalkStats {
        &self.stats
    }
}

impl Iterator for Walk {
    type Item = WalkedFile;

    fn next(&mut self) -> Option<WalkedFile> {
        loop {
            match self.inner.next()? {
                Ok(entry) => {
                    if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                        continue;
                    }
                    if !matches_extension(entry.path(), &self.extensions) {
                        self.stats.files_filtered += 1;
                        continue;
                    }
                    let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                    self.stats.files_found += 1;
                    return Some(WalkedFile {
                        depth: entry.depth(),
                        path: entry.into_path(),
                        size,
                    });
                }
                Err(err) => {
                    if is_loop_error(&err) {
                        tracing::warn!("Symlink loop detected: {}", err);
                        self.stats.symlink_loops += 1;
                    } else {
                        tracing::warn!("Walk error: {}", err);
                        self.stats.errors += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
