// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing with clap derive.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::region::Region;
use crate::verdict::DecoderKind;

/// An LLM-backed privacy compliance gate for frontend code
#[derive(Parser)]
#[command(name = "privacy-gate")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Use specific config file
    #[arg(
        short = 'C',
        long = "config",
        global = true,
        env = "PRIVACY_GATE_CONFIG"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check frontend sources against each region's privacy policy
    Check(CheckArgs),
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Folder to scan (default: source.root from config)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Check only files staged in the git index
    #[arg(long)]
    pub staged: bool,

    /// Check only files changed since a git base ref (e.g., main)
    #[arg(long, value_name = "REF", conflicts_with = "staged")]
    pub base: Option<String>,

    /// CI mode: check files changed since an auto-detected base branch
    #[arg(long)]
    pub ci: bool,

    /// Verdict protocol (overrides verdict.decoder)
    #[arg(long, value_name = "DECODER")]
    pub decoder: Option<DecoderKind>,

    /// Check only this region (repeatable)
    #[arg(long = "region", value_name = "REGION")]
    pub regions: Vec<Region>,

    /// File extension to include (repeatable, overrides source.extensions)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Maximum directory depth to traverse
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Skip cloning or updating the configured repository
    #[arg(long)]
    pub no_sync: bool,

    /// Print the files that would be sent and exit
    #[arg(long)]
    pub list_files: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
