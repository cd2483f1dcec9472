// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run layout: which config applies and where its paths point.
//!
//! The config comes from `-C`/`PRIVACY_GATE_CONFIG`, or from the nearest
//! privacy-gate.toml between the working directory and its git root.
//! Relative paths inside the file (`source.root`, `repository.path`)
//! resolve against the directory holding it, so a check run from a
//! subdirectory scans the same tree as one run next to the config.

use std::path::{Path, PathBuf};

use crate::config::{self, CONFIG_FILE_NAME, Config, RepositoryConfig};
use crate::error::{Error, Result};

/// Find privacy-gate.toml starting from `start_dir` and walking up to git root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        // A clone's own .git ends the search too.
        if dir.join(".git").exists() {
            return None;
        }
    }
    None
}

/// Paths a check run works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Config file in effect; `None` means built-in defaults.
    pub config_path: Option<PathBuf>,
    /// Directory relative config paths resolve against.
    pub base_dir: PathBuf,
    cwd: PathBuf,
}

impl Layout {
    /// Resolve the config file and base directory.
    ///
    /// An explicit path is taken relative to `cwd` and must exist.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => {
                let path = cwd.join(path);
                if !path.is_file() {
                    return Err(Error::Config {
                        message: format!("config file not found: {}", path.display()),
                        path: Some(path),
                    });
                }
                Some(path)
            }
            None => find_config(cwd),
        };

        let base_dir = config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);

        Ok(Self {
            config_path,
            base_dir,
            cwd: cwd.to_path_buf(),
        })
    }

    /// Load the config in effect, or defaults when there is none.
    pub fn load(&self) -> Result<Config> {
        match &self.config_path {
            Some(path) => {
                tracing::debug!("loading config from {}", path.display());
                config::load_with_warnings(path)
            }
            None => {
                tracing::debug!("no config found, using defaults");
                Ok(Config::default())
            }
        }
    }

    /// Working copy for a configured repository.
    pub fn clone_dir(&self, repo: &RepositoryConfig) -> PathBuf {
        self.base_dir.join(&repo.path)
    }

    /// Directory to scan.
    ///
    /// A positional `path` is relative to the working directory. Otherwise
    /// the configured root is used, inside the clone when one is set.
    pub fn scan_root(&self, config: &Config, path: Option<&Path>) -> PathBuf {
        match path {
            Some(path) => self.cwd.join(path),
            None => self.base_dir.join(config.scan_root()),
        }
    }
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
