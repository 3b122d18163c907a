//! Git command surface used by the workspace manager and change detector.
//!
//! All operations shell out to the system `git`, which picks up SSH keys,
//! credential helpers and `~/.gitconfig` the same way an interactive user
//! would. Calls go through a [`CommandRunner`] so they can be scripted in
//! tests.

use crate::error::{Error, Result};
use crate::process::{CommandRunner, Invocation};
use std::path::Path;

/// Length of the abbreviated commit hash used for markers and `SHORT_SHA`.
pub const SHORT_SHA_LEN: usize = 7;

pub struct Git<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> Git<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// `git clone --branch <ref> --single-branch <url> <name>`, run in `parent`.
    pub fn clone_single_branch(
        &self,
        url: &str,
        ref_name: &str,
        parent: &Path,
        name: &str,
    ) -> Result<()> {
        let inv = Invocation::new(
            "git",
            ["clone", "--branch", ref_name, "--single-branch", url, name],
        )
        .in_dir(parent);
        self.runner.run(&inv).map_err(|e| Error::GitClone {
            url: url.to_string(),
            r#ref: ref_name.to_string(),
            message: e.to_string(),
        })
    }

    /// `git fetch --all --prune`
    pub fn fetch_all(&self, repo_dir: &Path) -> Result<()> {
        self.runner
            .run(&Invocation::new("git", ["fetch", "--all", "--prune"]).in_dir(repo_dir))
    }

    /// `git checkout <ref>`
    pub fn checkout(&self, repo_dir: &Path, ref_name: &str) -> Result<()> {
        self.runner
            .run(&Invocation::new("git", ["checkout", ref_name]).in_dir(repo_dir))
            .map_err(|e| Error::GitCheckout {
                r#ref: ref_name.to_string(),
                message: e.to_string(),
            })
    }

    /// `git pull --ff-only origin <ref>`
    pub fn pull_ff_only(&self, repo_dir: &Path, ref_name: &str) -> Result<()> {
        self.runner.run(
            &Invocation::new("git", ["pull", "--ff-only", "origin", ref_name]).in_dir(repo_dir),
        )
    }

    /// `git fetch -q --tags`
    pub fn fetch_tags(&self, repo_dir: &Path) -> Result<()> {
        self.runner
            .run(&Invocation::new("git", ["fetch", "-q", "--tags"]).in_dir(repo_dir))
    }

    /// Most recent tag reachable from `HEAD` (`git describe --tags --abbrev=0`).
    ///
    /// An empty answer is treated as "no tag".
    pub fn latest_tag(&self, repo_dir: &Path) -> Result<Option<String>> {
        let tag = self.runner.output(
            &Invocation::new("git", ["describe", "--tags", "--abbrev=0"]).in_dir(repo_dir),
        )?;
        Ok(Some(tag).filter(|t| !t.is_empty()))
    }

    /// Abbreviated hash of `HEAD`.
    pub fn short_head(&self, repo_dir: &Path) -> Result<String> {
        let arg = format!("--short={}", SHORT_SHA_LEN);
        self.runner
            .output(&Invocation::new("git", ["rev-parse", arg.as_str(), "HEAD"]).in_dir(repo_dir))
    }
}
