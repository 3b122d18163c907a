//! # Multi-Platform Builder
//!
//! Builds one binary per configured `os/arch` target, in configured order.
//!
//! ## Build environment
//!
//! Each platform gets its own environment list, assembled in this order:
//!
//! 1. the inherited process environment snapshot (sorted by key);
//! 2. `GOOS`, `GOARCH`, `CGO_ENABLED=0`, `SHORT_SHA`, `OUTPUT`, `WORKSPACE`;
//! 3. the repository's `env` entries, in declaration order.
//!
//! Later entries win, so a repository can shadow any built-in (for example
//! pin `GOOS`, or enable cgo).
//!
//! ## Command line
//!
//! The toolchain is executed directly, never through a shell. Tokenized
//! `build_args` and the structured `build` options have `$VAR` references
//! expanded against the platform environment, one argument at a time, so a
//! value containing spaces or shell metacharacters stays a single argument.
//!
//! A failed build aborts the remaining platforms for that repository.
//! Malformed platform entries are skipped with a warning.

use crate::config::{expand_str, BuildCommand, BuildOptions, EnvSnapshot, RepoSpec};
use crate::error::{Error, Result};
use crate::platform::Platform;
use crate::process::{CommandRunner, Invocation};
use crate::toolchain::Toolchain;
use log::{info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory, relative to the clone, that receives build outputs.
pub const ARTIFACTS_DIR: &str = "artifacts";

/// A binary produced for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub platform: Platform,
    pub path: PathBuf,
}

pub struct Builder<'a> {
    runner: &'a dyn CommandRunner,
    base_env: &'a EnvSnapshot,
}

impl<'a> Builder<'a> {
    pub fn new(runner: &'a dyn CommandRunner, base_env: &'a EnvSnapshot) -> Self {
        Self { runner, base_env }
    }

    /// Provisions the toolchain and builds every valid platform of `repo`.
    pub fn build_all(
        &self,
        repo: &RepoSpec,
        repo_dir: &Path,
        short_sha: &str,
    ) -> Result<Vec<Artifact>> {
        let artifacts_dir = repo_dir.join(ARTIFACTS_DIR);
        fs::create_dir_all(&artifacts_dir)?;

        let toolchain = Toolchain::new(&repo.go_version);
        toolchain.ensure_installed(self.runner, &repo.name);
        toolchain.tidy(self.runner, &repo.name, repo_dir);

        let mut artifacts = Vec::new();
        for spec in &repo.platforms {
            let Some(platform) = Platform::parse(spec) else {
                warn!("[{}] invalid platform: {}", repo.name, spec);
                continue;
            };

            let output = artifacts_dir.join(platform.artifact_name(&repo.name));
            let env = platform_env(self.base_env, repo, &platform, short_sha, &output);
            let args = command_args(&repo.build, &output, &env);
            let invocation = Invocation::new(&toolchain.binary(), args)
                .in_dir(repo_dir)
                .with_env(env);

            info!("[{}][{}] RUN: {}", repo.name, platform, invocation);
            self.runner.run(&invocation).map_err(|e| Error::Build {
                repo: repo.name.clone(),
                platform: platform.to_string(),
                message: e.to_string(),
            })?;

            artifacts.push(Artifact {
                platform,
                path: output,
            });
        }

        if artifacts.is_empty() {
            warn!("[{}] no valid platforms, nothing was built", repo.name);
        }
        Ok(artifacts)
    }
}

/// Builds the environment list for one platform build.
pub fn platform_env(
    base: &EnvSnapshot,
    repo: &RepoSpec,
    platform: &Platform,
    short_sha: &str,
    output: &Path,
) -> Vec<(String, String)> {
    let mut env: Vec<(String, String)> = base.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    env.sort();

    let builtins = [
        ("GOOS", platform.os.clone()),
        ("GOARCH", platform.arch.clone()),
        ("CGO_ENABLED", "0".to_string()),
        ("SHORT_SHA", short_sha.to_string()),
        ("OUTPUT", output.to_string_lossy().into_owned()),
        ("WORKSPACE", repo.workspace_root.to_string_lossy().into_owned()),
    ];
    env.extend(builtins.into_iter().map(|(k, v)| (k.to_string(), v)));
    env.extend(repo.env.iter().cloned());
    env
}

/// Renders the toolchain arguments for one platform.
pub fn command_args(build: &BuildCommand, output: &Path, env: &[(String, String)]) -> Vec<String> {
    // Inserting in order leaves the last value of each key.
    let lookup: HashMap<String, String> = env.iter().cloned().collect();
    let x = |s: &str| expand_str(s, &lookup);

    match build {
        BuildCommand::Args(tokens) => tokens.iter().map(|t| x(t)).collect(),
        BuildCommand::Structured(opts) => structured_args(opts, output, &x),
    }
}

fn structured_args(opts: &BuildOptions, output: &Path, x: &dyn Fn(&str) -> String) -> Vec<String> {
    let mut args = vec!["build".to_string()];
    if opts.trimpath {
        args.push("-trimpath".to_string());
    }
    if !opts.tags.is_empty() {
        args.push("-tags".to_string());
        args.push(opts.tags.join(","));
    }
    if !opts.ldflags.trim().is_empty() {
        args.push("-ldflags".to_string());
        args.push(x(&opts.ldflags));
    }
    args.push("-o".to_string());
    args.push(output.to_string_lossy().into_owned());
    args.extend(opts.flags.iter().map(|f| x(f)));
    args.push(x(opts.package.as_deref().unwrap_or(".")));
    args
}
