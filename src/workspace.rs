//! Workspace Manager: clone-or-update of a repository's working copy.
//!
//! A fresh clone is made with `--single-branch` at the target ref. An
//! existing clone is refreshed with a pruning fetch, checked out at the
//! target, and fast-forwarded from `origin`. Only the clone and the checkout
//! are required to succeed; fetch and pull failures are logged and ignored,
//! since a detached checkout (a tag or a commit) has nothing to fast-forward.

use crate::error::{Error, Result};
use crate::git::Git;
use crate::resolve::Target;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Ensures `workspace_root/name` exists and is checked out at `target`.
///
/// Returns the clone directory.
pub fn ensure_checkout(
    git: &Git<'_>,
    workspace_root: &Path,
    name: &str,
    url: &str,
    target: &Target,
) -> Result<PathBuf> {
    let repo_dir = workspace_root.join(name);

    if !repo_dir.exists() {
        fs::create_dir_all(workspace_root)?;
        info!("[{}] git clone {} (ref={})", name, url, target);
        git.clone_single_branch(url, &target.name, workspace_root, name)?;
        return Ok(repo_dir);
    }

    if !repo_dir.join(".git").exists() {
        return Err(Error::NotARepository { path: repo_dir });
    }

    info!("[{}] git fetch & checkout {}", name, target);
    if let Err(e) = git.fetch_all(&repo_dir) {
        warn!("[{}] fetch failed, continuing with local refs: {}", name, e);
    }
    git.checkout(&repo_dir, &target.name)?;
    if let Err(e) = git.pull_ff_only(&repo_dir, &target.name) {
        info!("[{}] fast-forward of {} skipped: {}", name, target, e);
    }

    Ok(repo_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::testing::ScriptedRunner;
    use crate::resolve::resolve_target;
    use tempfile::TempDir;

    #[test]
    fn test_clones_when_missing_and_creates_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("nested/ws");
        let runner = ScriptedRunner::new();

        let repo_dir = ensure_checkout(
            &Git::new(&runner),
            &root,
            "demo",
            "https://example.com/demo.git",
            &resolve_target("", "main").unwrap(),
        )
        .unwrap();

        assert!(root.is_dir());
        assert_eq!(repo_dir, root.join("demo"));
        assert_eq!(
            runner.lines(),
            vec!["git clone --branch main --single-branch https://example.com/demo.git demo"]
        );
    }

    #[test]
    fn test_clone_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        runner.on("git clone", Err("repository not found"));

        let result = ensure_checkout(
            &Git::new(&runner),
            temp.path(),
            "demo",
            "u",
            &resolve_target("v1", "").unwrap(),
        );
        assert!(matches!(result, Err(Error::GitClone { .. })));
    }

    #[test]
    fn test_updates_existing_clone() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("demo/.git")).unwrap();
        let runner = ScriptedRunner::new();

        let repo_dir = ensure_checkout(
            &Git::new(&runner),
            temp.path(),
            "demo",
            "u",
            &resolve_target("v1.2.0", "main").unwrap(),
        )
        .unwrap();

        assert_eq!(repo_dir, temp.path().join("demo"));
        assert_eq!(
            runner.lines(),
            vec![
                "git fetch --all --prune",
                "git checkout v1.2.0",
                "git pull --ff-only origin v1.2.0",
            ]
        );
        for call in runner.calls.borrow().iter() {
            assert_eq!(call.dir.as_deref(), Some(temp.path().join("demo").as_path()));
        }
    }

    #[test]
    fn test_fetch_and_pull_failures_are_ignored() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("demo/.git")).unwrap();
        let runner = ScriptedRunner::new();
        runner.on("git fetch", Err("could not resolve host"));
        runner.on("git pull", Err("not possible to fast-forward"));

        let result = ensure_checkout(
            &Git::new(&runner),
            temp.path(),
            "demo",
            "u",
            &resolve_target("v1.2.0", "").unwrap(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_checkout_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("demo/.git")).unwrap();
        let runner = ScriptedRunner::new();
        runner.on("git checkout", Err("pathspec 'v9' did not match"));

        let result = ensure_checkout(
            &Git::new(&runner),
            temp.path(),
            "demo",
            "u",
            &resolve_target("v9", "").unwrap(),
        );
        assert!(matches!(result, Err(Error::GitCheckout { .. })));
        assert!(!runner.lines().iter().any(|l| l.starts_with("git pull")));
    }

    #[test]
    fn test_existing_dir_without_git_metadata() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("demo")).unwrap();
        let runner = ScriptedRunner::new();

        let result = ensure_checkout(
            &Git::new(&runner),
            temp.path(),
            "demo",
            "u",
            &resolve_target("main", "").unwrap(),
        );
        assert!(matches!(result, Err(Error::NotARepository { .. })));
        assert!(runner.lines().is_empty());
    }
}
