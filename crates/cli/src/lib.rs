// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! LLM-backed privacy compliance gate.
//!
//! Collects frontend sources, pairs them with each region's privacy policy,
//! asks a chat-completion model for a verdict, and reports whether every
//! region passed.

pub mod cli;
pub mod collect;
pub mod color;
pub mod config;
pub mod discovery;
pub mod error;
pub mod git;
pub mod http;
pub mod model;
pub mod output;
pub mod policy;
pub mod prompt;
pub mod reader;
pub mod region;
pub mod runner;
pub mod verdict;
pub mod walker;

pub use cli::{CheckArgs, Cli, Command};
pub use collect::{Collector, Selection, SourceBundle, SourceFile};
pub use config::{Config, RegionTarget};
pub use error::{Error, ExitCode, Result};
pub use model::{ChatCompletionClient, ModelClient};
pub use policy::{HttpPolicySource, PolicySource};
pub use reader::FileReader;
pub use region::Region;
pub use runner::{Assessment, RegionOutcome, RunResult, Runner};
pub use verdict::{DecoderKind, Verdict, VerdictDecoder};
pub use walker::{FileWalker, WalkStats, WalkedFile, WalkerConfig};

#[cfg(test)]
pub mod test_utils;
