// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration parsing and validation.
//!
//! Handles privacy-gate.toml parsing with version validation and unknown key
//! warnings. Secrets never live here: the model API key is read from the
//! environment variable named by `model.api_key_env`.

mod parse;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::region::Region;
use crate::verdict::DecoderKind;
use crate::walker::DEFAULT_EXTENSIONS;
use parse::strip_unknown_keys;

/// Config file name searched for during discovery.
pub const CONFIG_FILE_NAME: &str = "privacy-gate.toml";

/// Currently supported config version.
pub const SUPPORTED_VERSION: i64 = 1;

/// Minimum config structure for version checking.
#[derive(Deserialize)]
struct VersionOnly {
    version: Option<i64>,
}

/// Full configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Config file version (must be 1).
    pub version: i64,

    /// Which files to scan.
    #[serde(default)]
    pub source: SourceConfig,

    /// Remote repository to clone/update before scanning.
    #[serde(default)]
    pub repository: Option<RepositoryConfig>,

    /// Chat-completion endpoint settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Verdict protocol.
    #[serde(default)]
    pub verdict: VerdictConfig,

    /// Per-region settings.
    #[serde(default)]
    pub regions: RegionsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: SUPPORTED_VERSION,
            source: SourceConfig::default(),
            repository: None,
            model: ModelConfig::default(),
            verdict: VerdictConfig::default(),
            regions: RegionsConfig::default(),
        }
    }
}

impl Config {
    /// Directory to scan, inside the synced clone when one is configured.
    pub fn scan_root(&self) -> PathBuf {
        match &self.repository {
            Some(repo) => repo.path.join(&self.source.root),
            None => self.source.root.clone(),
        }
    }
}

/// Source selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Folder holding the frontend code.
    #[serde(default = "SourceConfig::default_root")]
    pub root: PathBuf,

    /// Allowed file extensions.
    #[serde(default = "SourceConfig::default_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns excluded from whole-tree scans.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether whole-tree scans honour .gitignore.
    #[serde(default)]
    pub git_ignore: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: Self::default_root(),
            extensions: Self::default_extensions(),
            exclude: Vec::new(),
            git_ignore: false,
        }
    }
}

impl SourceConfig {
    fn default_root() -> PathBuf {
        PathBuf::from("gdpr-frontend")
    }

    fn default_extensions() -> Vec<String> {
        DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
    }
}

/// Remote repository synced before scanning.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Clone URL.
    pub url: String,

    /// Local working copy.
    #[serde(default = "RepositoryConfig::default_path")]
    pub path: PathBuf,

    /// Branch to check out.
    #[serde(default = "RepositoryConfig::default_branch")]
    pub branch: String,
}

impl RepositoryConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("gdpr-clone")
    }

    fn default_branch() -> String {
        "master".to_string()
    }
}

/// Chat-completion endpoint settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Full URL of the chat-completions endpoint.
    #[serde(default = "ModelConfig::default_endpoint")]
    pub endpoint: String,

    /// Model identifier.
    #[serde(default = "ModelConfig::default_name")]
    pub name: String,

    /// Sampling temperature.
    #[serde(default = "ModelConfig::default_temperature")]
    pub temperature: f32,

    /// Environment variable holding the API key.
    #[serde(default = "ModelConfig::default_api_key_env")]
    pub api_key_env: String,

    /// Optional `HTTP-Referer` header.
    #[serde(default)]
    pub referer: Option<String>,

    /// Optional `X-Title` header.
    #[serde(default = "ModelConfig::default_title")]
    pub title: Option<String>,

    /// Per-request timeout in seconds (absent = wait indefinitely).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            name: Self::default_name(),
            temperature: Self::default_temperature(),
            api_key_env: Self::default_api_key_env(),
            referer: None,
            title: Self::default_title(),
            timeout_secs: None,
        }
    }
}

impl ModelConfig {
    fn default_endpoint() -> String {
        "https://openrouter.ai/api/v1/chat/completions".to_string()
    }

    fn default_name() -> String {
        "openai/gpt-3.5-turbo".to_string()
    }

    fn default_temperature() -> f32 {
        0.7
    }

    fn default_api_key_env() -> String {
        "OPENROUTER_API_KEY".to_string()
    }

    fn default_title() -> Option<String> {
        Some("GDPR Compliance Checker".to_string())
    }
}

/// Verdict protocol selection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerdictConfig {
    /// Decoder (and prompt contract) to use.
    #[serde(default)]
    pub decoder: DecoderKind,
}

/// Per-region settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionsConfig {
    #[serde(default)]
    pub europe: RegionConfig,

    #[serde(default)]
    pub us: RegionConfig,
}

impl RegionsConfig {
    /// Settings for one region.
    pub fn get(&self, region: Region) -> &RegionConfig {
        match region {
            Region::Europe => &self.europe,
            Region::Us => &self.us,
        }
    }

    /// Enabled regions with their resolved policy URLs, in report order.
    pub fn targets(&self) -> Vec<RegionTarget> {
        Region::ALL
            .into_iter()
            .filter(|r| self.get(*r).enabled)
            .map(|r| self.target(r))
            .collect()
    }

    /// One region with its resolved policy URL, enabled or not.
    pub fn target(&self, region: Region) -> RegionTarget {
        RegionTarget {
            region,
            policy_url: self
                .get(region)
                .policy_url
                .clone()
                .unwrap_or_else(|| region.default_policy_url().to_string()),
        }
    }
}

/// One region's settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionConfig {
    /// Override for the policy text URL.
    #[serde(default)]
    pub policy_url: Option<String>,

    /// Whether the region is checked.
    #[serde(default = "RegionConfig::default_enabled")]
    pub enabled: bool,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            policy_url: None,
            enabled: true,
        }
    }
}

impl RegionConfig {
    fn default_enabled() -> bool {
        true
    }
}

/// A region to check and where its policy lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTarget {
    pub region: Region,
    pub policy_url: String,
}

/// Load and validate config from a file path.
pub fn load(path: &Path) -> Result<Config> {
    parse(&read(path)?, path)
}

/// Load config with warnings for unknown keys.
pub fn load_with_warnings(path: &Path) -> Result<Config> {
    parse_with_warnings(&read(path)?, path)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn config_error(path: &Path, message: impl Into<String>) -> Error {
    Error::Config {
        message: message.into(),
        path: Some(path.to_path_buf()),
    }
}

/// Validate the `version` field.
fn check_version(content: &str, path: &Path) -> Result<()> {
    let version_check: VersionOnly =
        toml::from_str(content).map_err(|e| config_error(path, e.to_string()))?;

    let version = version_check
        .version
        .ok_or_else(|| config_error(path, "missing required field: version"))?;

    if version != SUPPORTED_VERSION {
        return Err(config_error(
            path,
            format!(
                "unsupported config version {} (supported: {})\n  Upgrade privacy-gate to use this config.",
                version, SUPPORTED_VERSION
            ),
        ));
    }
    Ok(())
}

/// Parse config from string content (strict mode).
pub fn parse(content: &str, path: &Path) -> Result<Config> {
    check_version(content, path)?;
    toml::from_str(content).map_err(|e| config_error(path, e.to_string()))
}

/// Parse config, warning on (and dropping) unknown keys.
pub fn parse_with_warnings(content: &str, path: &Path) -> Result<Config> {
    check_version(content, path)?;

    let mut table: toml::Table =
        toml::from_str(content).map_err(|e| config_error(path, e.to_string()))?;
    strip_unknown_keys(&mut table, path);

    Config::deserialize(toml::Value::Table(table)).map_err(|e| config_error(path, e.to_string()))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
