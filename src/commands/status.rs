//! Status command implementation
//!
//! Reports, for each configured repository, the commit recorded by the last
//! successful build and the artifacts currently on disk. Read-only: no git
//! or toolchain command is run.

use anyhow::Result;
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

use crossbuild::builder::ARTIFACTS_DIR;
use crossbuild::config::{self, RepoSpec};
use crossbuild::marker::BuildMarker;
use crossbuild::output::{emoji, OutputConfig};

use super::DEFAULT_CONFIG;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Path to the configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = DEFAULT_CONFIG,
        env = "CROSSBUILD_CONFIG"
    )]
    pub config: PathBuf,
}

/// Execute the status command
pub fn execute(args: StatusArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let cfg = config::load(&args.config, &config::process_env())?;

    for repo in &cfg.repos {
        for line in repo_status(repo, &out)? {
            println!("{}", line);
        }
    }
    Ok(())
}

fn repo_status(repo: &RepoSpec, out: &OutputConfig) -> Result<Vec<String>> {
    let repo_dir = repo.repo_dir();
    if !repo_dir.exists() {
        return Ok(vec![format!(
            "{} {}: not cloned yet ({})",
            emoji(out, "⬜", "[NEW]"),
            repo.name,
            repo_dir.display()
        )]);
    }

    let sha = BuildMarker::new(&repo_dir).read()?;
    let mut lines = vec![if sha.is_empty() {
        format!(
            "{} {}: cloned, never built",
            emoji(out, "🟡", "[PENDING]"),
            repo.name
        )
    } else {
        format!(
            "{} {}: last built {}",
            emoji(out, "✅", "[BUILT]"),
            repo.name,
            sha
        )
    }];
    lines.extend(
        list_artifacts(&repo_dir.join(ARTIFACTS_DIR))?
            .into_iter()
            .map(|name| format!("     {}", name)),
    );
    Ok(lines)
}

fn list_artifacts(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
