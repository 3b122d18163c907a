//! Pinned Go toolchain management.
//!
//! A specific release is provisioned with the `golang.org/dl` wrappers:
//! `go install golang.org/dl/go<ver>@latest` installs a `go<ver>` binary,
//! and `go<ver> download` fetches the release itself. Every step here is
//! best-effort; a missing toolchain shows up later as a build failure for
//! each platform.

use crate::process::{CommandRunner, Invocation};
use log::{info, warn};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    version: String,
}

impl Toolchain {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
        }
    }

    /// Name of the versioned wrapper binary, e.g. `go1.24`.
    pub fn binary(&self) -> String {
        format!("go{}", self.version)
    }

    /// Installs the wrapper and downloads the release.
    pub fn ensure_installed(&self, runner: &dyn CommandRunner, repo: &str) {
        let module = format!("golang.org/dl/{}@latest", self.binary());
        info!("[{}] ensuring toolchain {}", repo, self.binary());
        if let Err(e) = runner.run(&Invocation::new("go", ["install", module.as_str()])) {
            warn!("[{}] toolchain install failed: {}", repo, e);
        }
        if let Err(e) = runner.run(&Invocation::new(&self.binary(), ["download"])) {
            warn!("[{}] toolchain download failed: {}", repo, e);
        }
    }

    /// `go<ver> mod tidy` inside the repository.
    pub fn tidy(&self, runner: &dyn CommandRunner, repo: &str, repo_dir: &Path) {
        let inv = Invocation::new(&self.binary(), ["mod", "tidy"]).in_dir(repo_dir);
        if let Err(e) = runner.run(&inv) {
            warn!("[{}] go mod tidy failed: {}", repo, e);
        }
    }
}
