// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Check command implementation.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use privacy_gate::Error;
use privacy_gate::cli::{CheckArgs, Cli};
use privacy_gate::collect::{Collector, Selection};
use privacy_gate::color::resolve_color;
use privacy_gate::config::{Config, RegionTarget};
use privacy_gate::discovery::Layout;
use privacy_gate::error::ExitCode;
use privacy_gate::git;
use privacy_gate::model::ChatCompletionClient;
use privacy_gate::output::TextFormatter;
use privacy_gate::policy::HttpPolicySource;
use privacy_gate::runner::Runner;
use privacy_gate::walker::WalkerConfig;

/// Run the check command.
pub fn run(cli: &Cli, args: &CheckArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;

    let layout = Layout::resolve(cli.config.as_deref(), &cwd)?;
    let mut config = layout.load()?;
    apply_overrides(&mut config, args);

    let targets = select_targets(&config, args)?;

    if let Some(repo) = &config.repository {
        if args.no_sync {
            tracing::debug!("skipping repository sync (--no-sync)");
        } else {
            git::clone_or_update(&repo.url, &layout.clone_dir(repo), &repo.branch)
                .map_err(|e| Error::Git(format!("failed to sync {}: {:#}", repo.url, e)))?;
        }
    }

    let root = layout.scan_root(&config, args.path.as_deref());
    let selection = resolve_selection(args, &root);
    tracing::debug!("scanning {} ({:?})", root.display(), selection);

    let collector = Collector::new(root.clone(), selection, walker_config(&config, args));

    if args.list_files {
        let files = collector.select()?;
        let mut formatter = TextFormatter::stdout(resolve_color());
        formatter.write_file_list(&root, &files)?;
        return Ok(ExitCode::Success);
    }

    let model = ChatCompletionClient::from_env(&config.model)?;
    let timeout = config.model.timeout_secs.map(Duration::from_secs);
    let policies = HttpPolicySource::new(timeout)?;

    let runner = Runner::new(
        Arc::new(policies),
        Arc::new(model),
        Arc::new(collector),
        config.verdict.decoder,
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let result = runtime.block_on(runner.run(&targets));

    let mut formatter = TextFormatter::stdout(resolve_color());
    for outcome in &result.outcomes {
        formatter.write_outcome(outcome)?;
    }
    formatter.write_summary(&result)?;

    Ok(result.exit_code())
}

/// Fold CLI flags into the loaded config.
fn apply_overrides(config: &mut Config, args: &CheckArgs) {
    if !args.extensions.is_empty() {
        config.source.extensions = args.extensions.clone();
    }
    if let Some(decoder) = args.decoder {
        config.verdict.decoder = decoder;
    }
}

/// Regions to check: those named with `--region`, else every enabled one.
fn select_targets(config: &Config, args: &CheckArgs) -> anyhow::Result<Vec<RegionTarget>> {
    let mut targets: Vec<RegionTarget> = if args.regions.is_empty() {
        config.regions.targets()
    } else {
        args.regions
            .iter()
            .map(|r| config.regions.target(*r))
            .collect()
    };
    targets.sort_by_key(|t| t.region);
    targets.dedup_by_key(|t| t.region);

    if targets.is_empty() {
        return Err(Error::Argument("no regions enabled".to_string()).into());
    }
    Ok(targets)
}

fn resolve_selection(args: &CheckArgs, root: &Path) -> Selection {
    if args.staged {
        return Selection::Staged;
    }
    if let Some(base) = &args.base {
        return Selection::Base(base.clone());
    }
    if args.ci {
        match git::detect_base_branch(root) {
            Some(base) => {
                tracing::info!("CI mode: comparing against {}", base);
                return Selection::Base(base);
            }
            None => tracing::info!("CI mode: no base branch found, scanning whole tree"),
        }
    }
    Selection::Tree
}

fn walker_config(config: &Config, args: &CheckArgs) -> WalkerConfig {
    let mut walker = WalkerConfig {
        extensions: config.source.extensions.clone(),
        exclude_patterns: config.source.exclude.clone(),
        git_ignore: config.source.git_ignore,
        ..WalkerConfig::default()
    };
    if let Some(depth) = args.max_depth {
        walker.max_depth = Some(depth);
    }
    walker
}
