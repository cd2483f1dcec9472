// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Compliance regions.
//!
//! The region's verdict key is shared between the prompt (which tells the
//! model what to answer) and the verdict decoders (which look for it in the
//! reply). Both sides must go through [`Region::key`].

use std::fmt;

use serde::Deserialize;

/// A jurisdiction checked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Europe (GDPR).
    Europe,
    /// United States.
    Us,
}

impl Region {
    /// All regions, in report order.
    pub const ALL: [Region; 2] = [Region::Europe, Region::Us];

    /// Human label used in prompts and reports.
    pub fn label(self) -> &'static str {
        match self {
            Region::Europe => "Europe (GDPR)",
            Region::Us => "US Privacy",
        }
    }

    /// Short key the model echoes back in its verdict.
    pub fn key(self) -> &'static str {
        match self {
            Region::Europe => "Europe",
            Region::Us => "US",
        }
    }

    /// Config/CLI name.
    pub fn name(self) -> &'static str {
        match self {
            Region::Europe => "europe",
            Region::Us => "us",
        }
    }

    /// Canonical pass line, e.g. `Europe policy PASSED`.
    pub fn pass_phrase(self) -> String {
        format!("{} policy PASSED", self.key())
    }

    /// Canonical fail line, e.g. `Europe policy FAILED`.
    pub fn fail_phrase(self) -> String {
        format!("{} policy FAILED", self.key())
    }

    /// Policy text used when the config does not override it.
    pub fn default_policy_url(self) -> &'static str {
        match self {
            Region::Europe => {
                "https://raw.githubusercontent.com/Sureshbalakrishnann/gdpr/master/policies/gdpr-europe.txt"
            }
            Region::Us => {
                "https://raw.githubusercontent.com/Sureshbalakrishnann/gdpr/master/policies/gdpr-us.txt"
            }
        }
    }

    /// Parse a config/CLI name.
    pub fn from_name(name: &str) -> Option<Region> {
        Region::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl clap::ValueEnum for Region {
    fn value_variants<'a>() -> &'a [Self] {
        &Region::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.name()))
    }
}

#[cfg(test)]
#[path = "region_tests.rs"]
mod tests;
