// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Git utilities for change-set selection and repository sync.
//!
//! Uses git2 (libgit2) for all git operations to avoid subprocess overhead.
//!
//! ## File Detection
//!
//! When detecting changed files:
//! - Added files: path from `new_file()`
//! - Modified files: path from `new_file()` (same as old)
//! - Renamed files: path from `new_file()` (the new location)
//! - Deleted files: path from `old_file()` (since `new_file()` is empty)
//!
//! Returned paths are absolute (joined onto the repository work tree).
//! Deleted paths are reported too; callers drop those missing on disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use git2::{Repository, build::CheckoutBuilder, build::RepoBuilder};

/// Extract file path from a diff delta.
///
/// For deleted files, `new_file().path()` is `None`, so fall back to `old_file()`.
fn extract_path<'a>(delta: &'a git2::DiffDelta<'a>) -> Option<&'a Path> {
    delta.new_file().path().or_else(|| delta.old_file().path())
}

/// Collect absolute paths from a diff.
fn diff_paths(workdir: &Path, diff: &git2::Diff<'_>) -> Vec<PathBuf> {
    diff.deltas()
        .filter_map(|delta| extract_path(&delta).map(|p| workdir.join(p)))
        .collect()
}

/// Open the repository containing `root` and return it with its work tree.
fn open_with_workdir(root: &Path) -> anyhow::Result<(Repository, PathBuf)> {
    let repo = Repository::discover(root).context("Failed to open repository")?;
    let workdir = repo
        .workdir()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow::anyhow!("repository has no work tree"))?;
    let workdir = std::fs::canonicalize(&workdir).unwrap_or(workdir);
    Ok((repo, workdir))
}

/// Check if a path is in a git repository.
pub fn is_git_repo(root: &Path) -> bool {
    Repository::discover(root).is_ok()
}

/// Detect base branch for CI mode (main or master).
pub fn detect_base_branch(root: &Path) -> Option<String> {
    let repo = Repository::discover(root).ok()?;

    for name in ["main", "master"] {
        if repo.find_branch(name, git2::BranchType::Local).is_ok() {
            return Some(name.to_string());
        }
    }

    // Check for remote branches if local don't exist
    for name in ["origin/main", "origin/master"] {
        if repo.revparse_single(name).is_ok() {
            return Some(name.to_string());
        }
    }

    None
}

/// Get files changed on HEAD since it diverged from `base` (`base...HEAD`).
///
/// Only committed changes count; the comparison starts at the merge base so
/// commits that landed on `base` afterwards are not reported.
pub fn get_branch_diff_files(root: &Path, base: &str) -> anyhow::Result<Vec<PathBuf>> {
    let (repo, workdir) = open_with_workdir(root)?;

    let base_oid = repo
        .revparse_single(base)
        .with_context(|| format!("Failed to resolve base ref: {}", base))?
        .peel_to_commit()
        .context("Base ref does not point at a commit")?
        .id();
    let head_commit = repo
        .head()
        .context("Failed to get HEAD")?
        .peel_to_commit()
        .context("HEAD does not point at a commit")?;

    let merge_base = repo
        .merge_base(base_oid, head_commit.id())
        .with_context(|| format!("No common ancestor between {} and HEAD", base))?;
    let base_tree = repo.find_commit(merge_base)?.tree()?;
    let head_tree = head_commit.tree()?;

    let diff = repo
        .diff_tree_to_tree(Some(&base_tree), Some(&head_tree), None)
        .context("Failed to compute diff")?;

    Ok(diff_paths(&workdir, &diff))
}

/// Get list of staged files (for --staged flag).
///
/// Uses git2 to compare the index against HEAD to find staged changes.
pub fn get_staged_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let (repo, workdir) = open_with_workdir(root)?;

    // Get HEAD tree (handle case of empty repo with no commits)
    let head_tree = match repo.head() {
        Ok(head) => Some(head.peel_to_tree().context("Failed to get HEAD tree")?),
        Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
        Err(e) => return Err(e).context("Failed to get HEAD"),
    };

    let index = repo.index().context("Failed to get repository index")?;

    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), Some(&index), None)
        .context("Failed to compute diff")?;

    Ok(diff_paths(&workdir, &diff))
}

/// Clone `url` into `path` on `branch`, or bring an existing clone up to date.
///
/// An existing clone is fetched from `origin`, switched to `branch`, and
/// fast-forwarded. Diverged history is an error rather than a merge.
pub fn clone_or_update(url: &str, path: &Path, branch: &str) -> anyhow::Result<()> {
    if !path.exists() {
        tracing::info!("cloning {} into {}", url, path.display());
        RepoBuilder::new()
            .branch(branch)
            .clone(url, path)
            .with_context(|| format!("Failed to clone {}", url))?;
        return Ok(());
    }

    tracing::info!("pulling latest changes into {}", path.display());
    let repo = Repository::open(path)
        .with_context(|| format!("Failed to open repository at {}", path.display()))?;

    let mut remote = repo
        .find_remote("origin")
        .context("Repository has no origin remote")?;
    remote
        .fetch(&[branch], None, None)
        .with_context(|| format!("Failed to fetch {} from origin", branch))?;

    let fetch_head = repo
        .find_reference("FETCH_HEAD")
        .context("Fetch produced no FETCH_HEAD")?;
    let incoming = repo.reference_to_annotated_commit(&fetch_head)?;

    let refname = format!("refs/heads/{}", branch);
    match repo.find_reference(&refname) {
        Ok(_) => {}
        Err(e) if e.code() == git2::ErrorCode::NotFound => {
            repo.reference(&refname, incoming.id(), false, "privacy-gate: create branch")?;
        }
        Err(e) => return Err(e).context("Failed to look up local branch"),
    }
    repo.set_head(&refname)?;
    repo.checkout_head(Some(CheckoutBuilder::default().force()))?;

    let (analysis, _) = repo.merge_analysis(&[&incoming])?;
    if analysis.is_up_to_date() {
        tracing::debug!("{} already up to date", branch);
        return Ok(());
    }
    if !analysis.is_fast_forward() {
        bail!(
            "local branch {} has diverged from origin; refusing to merge",
            branch
        );
    }

    let mut reference = repo.find_reference(&refname)?;
    reference.set_target(incoming.id(), "privacy-gate: fast-forward")?;
    repo.set_head(&refname)?;
    repo.checkout_head(Some(CheckoutBuilder::default().force()))?;

    Ok(())
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
