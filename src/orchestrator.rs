//! # Repository Orchestrator
//!
//! Sequences the per-repository pipeline and drives it across every
//! configured repository.
//!
//! For one repository, in order:
//!
//! 1. make the workspace root absolute and ensure it exists;
//! 2. clone or update the working copy at the target revision;
//! 3. when the target came from a branch, look up the latest reachable tag
//!    and use it as the display version (the checkout is left as is);
//! 4. read the short `HEAD` hash and compare it with the build marker;
//!    stop here when nothing changed;
//! 5. provision the toolchain and build every platform;
//! 6. record the new hash in the marker.
//!
//! A fatal error in one repository is recorded in the [`RunSummary`] and the
//! run continues with the next one, unless `fail_fast` is set. Repositories
//! are processed sequentially in configuration order.

use crate::builder::{Artifact, Builder};
use crate::config::{EnvSnapshot, RepoSpec, ValidatedConfig};
use crate::error::{Error, Result};
use crate::git::Git;
use crate::marker::BuildMarker;
use crate::process::CommandRunner;
use crate::workspace;
use log::{debug, error, info, warn};
use std::fs;

/// Controls a run across repositories.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Rebuild even when the marker matches `HEAD`.
    pub force: bool,
    /// Stop at the first failed repository.
    pub fail_fast: bool,
    /// Restrict the run to these repository names (empty means all).
    pub only: Vec<String>,
}

/// Result of processing one repository.
#[derive(Debug)]
pub enum RepoOutcome {
    Built {
        display_version: String,
        sha: String,
        artifacts: Vec<Artifact>,
    },
    Unchanged {
        display_version: String,
        sha: String,
    },
    Failed {
        error: Error,
    },
}

#[derive(Debug)]
pub struct RepoReport {
    pub name: String,
    pub outcome: RepoOutcome,
}

/// Per-repository outcomes of a run, in processing order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<RepoReport>,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RepoOutcome::Failed { .. }))
    }

    pub fn built(&self) -> usize {
        self.count(|o| matches!(o, RepoOutcome::Built { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, RepoOutcome::Unchanged { .. }))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, f: impl Fn(&RepoOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| f(&r.outcome)).count()
    }
}

pub struct Orchestrator<'a> {
    runner: &'a dyn CommandRunner,
    env: &'a EnvSnapshot,
}

impl<'a> Orchestrator<'a> {
    /// `env` is the process environment snapshot inherited by builds.
    pub fn new(runner: &'a dyn CommandRunner, env: &'a EnvSnapshot) -> Self {
        Self { runner, env }
    }

    /// Processes the selected repositories of `config`.
    ///
    /// Fails up front only when `options.only` names an unknown repository;
    /// per-repository failures are reported in the summary.
    pub fn run(&self, config: &ValidatedConfig, options: &RunOptions) -> Result<RunSummary> {
        for name in &options.only {
            if !config.repos.iter().any(|r| &r.name == name) {
                return Err(Error::UnknownRepo { name: name.clone() });
            }
        }

        let mut summary = RunSummary::default();
        let selected = config
            .repos
            .iter()
            .filter(|r| options.only.is_empty() || options.only.contains(&r.name));

        for repo in selected {
            info!(">>> Building {} @ {}", repo.name, repo.target);
            let outcome = match self.process_repo(repo, options.force) {
                Ok(outcome) => outcome,
                Err(e) => {
                    match &e {
                        Error::Build { .. } => error!("{}", e),
                        _ => error!("[{}] {}", repo.name, e),
                    }
                    RepoOutcome::Failed { error: e }
                }
            };
            let failed = matches!(outcome, RepoOutcome::Failed { .. });
            summary.reports.push(RepoReport {
                name: repo.name.clone(),
                outcome,
            });
            if failed && options.fail_fast {
                warn!("stopping after first failure (--fail-fast)");
                break;
            }
        }

        Ok(summary)
    }

    /// Runs the full pipeline for one repository.
    pub fn process_repo(&self, repo: &RepoSpec, force: bool) -> Result<RepoOutcome> {
        let repo = &anchored(repo)?;
        let git = Git::new(self.runner);
        fs::create_dir_all(&repo.workspace_root)?;

        let repo_dir = workspace::ensure_checkout(
            &git,
            &repo.workspace_root,
            &repo.name,
            &repo.git_url,
            &repo.target,
        )?;

        let mut display_version = repo.target.name.clone();
        if repo.target.wants_tag_upgrade() {
            info!("[{}] fetching tags", repo.name);
            if let Err(e) = git.fetch_tags(&repo_dir) {
                debug!("[{}] tag fetch failed: {}", repo.name, e);
            }
            match git.latest_tag(&repo_dir) {
                Ok(Some(tag)) => {
                    info!("[{}] latest tag = {}", repo.name, tag);
                    display_version = tag;
                }
                Ok(None) => info!("[{}] no tag found", repo.name),
                Err(e) => info!("[{}] no tag found: {}", repo.name, e),
            }
        }

        let sha = git.short_head(&repo_dir).unwrap_or_else(|e| {
            warn!("[{}] cannot read HEAD: {}", repo.name, e);
            String::new()
        });

        let marker = BuildMarker::new(&repo_dir);
        if !force && marker.is_unchanged(&sha)? {
            info!("[{}] no changes since {}, skip", repo.name, sha);
            return Ok(RepoOutcome::Unchanged {
                display_version,
                sha,
            });
        }
        info!("[{}] new commit {} ({})", repo.name, sha, display_version);

        let artifacts = Builder::new(self.runner, self.env).build_all(repo, &repo_dir, &sha)?;

        marker.write(&sha)?;
        info!("[{}] completed, SHA={}", repo.name, sha);

        Ok(RepoOutcome::Built {
            display_version,
            sha,
            artifacts,
        })
    }
}

/// Returns `repo` with an absolute workspace root.
///
/// Builds run inside the clone, so `OUTPUT` and `WORKSPACE` must not be
/// relative to the directory crossbuild was started from.
fn anchored(repo: &RepoSpec) -> Result<RepoSpec> {
    if repo.workspace_root.is_absolute() {
        return Ok(repo.clone());
    }
    Ok(RepoSpec {
        workspace_root: std::path::absolute(&repo.workspace_root)?,
        ..repo.clone()
    })
}
