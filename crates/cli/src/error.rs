// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

/// privacy-gate error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration file not found or invalid
    #[error("config error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Invalid command-line arguments
    #[error("argument error: {0}")]
    Argument(String),

    /// File I/O error
    #[error("io error: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds maximum size limit.
    #[error("file too large: {} ({} bytes, max: {} bytes)", .path.display(), .size, .max_size)]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Target folder for a whole-tree scan does not exist.
    #[error("target folder {} not found", .0.display())]
    NotFound(PathBuf),

    /// Nothing left to send after change-set filtering.
    #[error("no matching files found in {}", .0.display())]
    NoFilesFound(PathBuf),

    /// Policy text could not be retrieved.
    #[error("failed to fetch policy from {url}: HTTP {status}")]
    Fetch { url: String, status: u16 },

    /// Chat-completion endpoint answered with a non-success status.
    #[error("model API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Transport-level HTTP failure (connect, TLS, timeout).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(String),

    /// API key environment variable is unset or empty.
    #[error("missing API key: set the {0} environment variable")]
    MissingApiKey(String),

    /// Internal error (bug)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type using privacy-gate Error
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Every region passed
    Success = 0,
    /// A region failed, or setup could not complete
    Failed = 1,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
