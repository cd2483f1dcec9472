// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Source collection.
//!
//! Selects frontend files either by walking a whole folder or from a git
//! change-set, reads them, and bundles them into a single text blob for the
//! prompt.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::git;
use crate::reader::FileReader;
use crate::walker::{FileWalker, WalkerConfig, matches_extension};

/// Marker that opens every file section of a rendered bundle.
pub const FILE_HEADER_PREFIX: &str = "// --- File: ";

/// How files are chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every matching file below the root.
    Tree,
    /// Files staged in the index.
    Staged,
    /// Files changed on HEAD since it left the given ref (`ref...HEAD`).
    Base(String),
}

impl Selection {
    /// Whether the file list comes from git.
    pub fn is_change_set(&self) -> bool {
        !matches!(self, Selection::Tree)
    }
}

/// One collected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

/// Ordered set of collected files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceBundle {
    files: Vec<SourceFile>,
}

impl SourceBundle {
    pub fn new(files: Vec<SourceFile>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Concatenate every file behind a `// --- File: <path> ---` header.
    pub fn render(&self) -> String {
        let capacity = self
            .files
            .iter()
            .map(|f| f.content.len() + f.path.as_os_str().len() + 24)
            .sum();
        let mut out = String::with_capacity(capacity);
        for file in &self.files {
            let _ = write!(
                out,
                "\n\n{}{} ---\n{}",
                FILE_HEADER_PREFIX,
                file.path.display(),
                file.content
            );
        }
        out
    }
}

/// Builds a [`SourceBundle`] from a root and a selection strategy.
pub struct Collector {
    root: PathBuf,
    selection: Selection,
    walker: FileWalker,
    reader: FileReader,
}

impl Collector {
    pub fn new(root: impl Into<PathBuf>, selection: Selection, walker: WalkerConfig) -> Self {
        Self {
            root: root.into(),
            selection,
            walker: FileWalker::new(walker),
            reader: FileReader::new(),
        }
    }

    /// Replace the file reader (size limit).
    pub fn with_reader(mut self, reader: FileReader) -> Self {
        self.reader = reader;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Paths that would be bundled, without reading them.
    pub fn select(&self) -> Result<Vec<PathBuf>> {
        match &self.selection {
            Selection::Tree => self.select_tree(),
            Selection::Staged => {
                let listed = git::get_staged_files(&self.root).map_err(git_error)?;
                self.filter_change_set(listed)
            }
            Selection::Base(base) => {
                let listed = git::get_branch_diff_files(&self.root, base).map_err(git_error)?;
                self.filter_change_set(listed)
            }
        }
    }

    /// Select and read every file.
    pub fn collect(&self) -> Result<SourceBundle> {
        let mut files = Vec::new();
        for path in self.select()? {
            match self.reader.read_text(&path) {
                Ok(content) => files.push(SourceFile { path, content }),
                Err(Error::FileTooLarge { path, size, .. }) => {
                    tracing::warn!(
                        "skipping {} ({} bytes, over size limit)",
                        path.display(),
                        size
                    );
                }
                Err(err) => return Err(err),
            }
        }

        tracing::debug!(
            "collected {} file(s) from {}",
            files.len(),
            self.root.display()
        );
        Ok(SourceBundle::new(files))
    }

    fn select_tree(&self) -> Result<Vec<PathBuf>> {
        if !self.root.exists() {
            return Err(Error::NotFound(self.root.clone()));
        }

        let mut walk = self.walker.walk(&self.root);
        let paths: Vec<PathBuf> = walk.by_ref().map(|f| f.path).collect();
        tracing::debug!("walk stats: {:?}", walk.stats());
        if paths.is_empty() {
            tracing::warn!("no matching files under {}", self.root.display());
        }
        Ok(paths)
    }

    /// Keep listed paths under the root, with an allowed extension, that
    /// still exist on disk. Kept paths are re-rooted onto `self.root`.
    fn filter_change_set(&self, listed: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
        let root = std::fs::canonicalize(&self.root).unwrap_or_else(|_| self.root.clone());
        let extensions = &self.walker.config().extensions;

        let paths: Vec<PathBuf> = listed
            .into_iter()
            .filter_map(|p| p.strip_prefix(&root).ok().map(|rel| self.root.join(rel)))
            .filter(|p| matches_extension(p, extensions))
            .filter(|p| {
                let exists = p.is_file();
                if !exists {
                    tracing::debug!("skipping {} (no longer on disk)", p.display());
                }
                exists
            })
            .collect();

        if paths.is_empty() {
            return Err(Error::NoFilesFound(self.root.clone()));
        }
        Ok(paths)
    }
}

fn git_error(err: anyhow::Error) -> Error {
    Error::Git(format!("{:#}", err))
}

#[cfg(test)]
#[path = "collect_tests.rs"]
mod tests;
