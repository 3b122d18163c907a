//! Fallback chains and target revision resolution.
//!
//! Several settings fall back through an ordered list of sources: the target
//! revision (version, then branch), the toolchain version (repo, then global)
//! and the workspace root (repo `WORKSPACE` env entry, then global, then the
//! current directory). All of them go through [`first_non_empty`].

use std::fmt;
use std::path::PathBuf;

/// Toolchain version used when neither the repo nor the globals name one.
pub const DEFAULT_GO_VERSION: &str = "1.24";

/// Returns the first candidate that is not empty after trimming whitespace.
pub fn first_non_empty<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    candidates.into_iter().find(|c| !c.trim().is_empty())
}

/// Where the target revision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionSource {
    /// An explicit `version` (tag, branch or commit-ish) was configured.
    Version,
    /// No version was configured; the `branch` is used and a tag lookup
    /// may refine the display version afterwards.
    Branch,
}

/// The revision a repository should be checked out at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub source: RevisionSource,
}

impl Target {
    /// Whether a latest-tag lookup should run after checkout.
    pub fn wants_tag_upgrade(&self) -> bool {
        self.source == RevisionSource::Branch
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Resolves the target revision: `version` wins over `branch`.
///
/// Returns `None` when both are empty; callers turn that into a
/// configuration error.
pub fn resolve_target(version: &str, branch: &str) -> Option<Target> {
    if !version.trim().is_empty() {
        return Some(Target {
            name: version.trim().to_string(),
            source: RevisionSource::Version,
        });
    }
    if !branch.trim().is_empty() {
        return Some(Target {
            name: branch.trim().to_string(),
            source: RevisionSource::Branch,
        });
    }
    None
}

/// Repo toolchain version, else the global default, else [`DEFAULT_GO_VERSION`].
pub fn resolve_go_version(repo: &str, global: &str) -> String {
    first_non_empty([repo, global])
        .unwrap_or(DEFAULT_GO_VERSION)
        .trim()
        .to_string()
}

/// Repo `WORKSPACE` env override, else the global workspace dir, else `.`.
pub fn resolve_workspace_root(repo_override: Option<&str>, global: &str) -> PathBuf {
    let chosen = first_non_empty([repo_override.unwrap_or(""), global]).unwrap_or(".");
    PathBuf::from(chosen.trim())
}
