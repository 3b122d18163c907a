//! Build command implementation
//!
//! Loads the configuration, runs the orchestrator over the selected
//! repositories, and prints a per-repository summary. Exits with an error
//! when any repository failed.

use anyhow::Result;
use clap::Args;
use log::info;
use std::path::PathBuf;

use crossbuild::config;
use crossbuild::orchestrator::{Orchestrator, RepoOutcome, RunOptions, RunSummary};
use crossbuild::output::{emoji, outcome_marker, OutputConfig};
use crossbuild::process::SystemRunner;

use super::DEFAULT_CONFIG;

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = DEFAULT_CONFIG,
        env = "CROSSBUILD_CONFIG"
    )]
    pub config: PathBuf,

    /// Only process this repository (repeatable)
    #[arg(short, long, value_name = "NAME")]
    pub repo: Vec<String>,

    /// Rebuild even when the commit has not changed since the last build
    #[arg(short, long)]
    pub force: bool,

    /// Stop at the first repository that fails
    #[arg(long)]
    pub fail_fast: bool,
}

/// Execute the build command
pub fn execute(args: BuildArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let env = config::process_env();
    let cfg = config::load(&args.config, &env)?;
    info!(
        "Using default_go_version = {:?}",
        cfg.globals.default_go_version
    );

    let options = RunOptions {
        force: args.force,
        fail_fast: args.fail_fast,
        only: args.repo,
    };
    let summary = Orchestrator::new(&SystemRunner, &env).run(&cfg, &options)?;

    print!("{}", render_summary(&summary, &out));

    if !summary.is_success() {
        anyhow::bail!(
            "{} of {} repositories failed",
            summary.failed(),
            summary.reports.len()
        );
    }
    Ok(())
}

fn render_summary(summary: &RunSummary, out: &OutputConfig) -> String {
    let mut lines = vec![
        String::new(),
        format!("{} Build summary", emoji(out, "📊", "[INFO]")),
    ];

    for report in &summary.reports {
        let marker = outcome_marker(out, &report.outcome);
        match &report.outcome {
            RepoOutcome::Built {
                display_version,
                sha,
                artifacts,
            } => {
                lines.push(format!(
                    "{} {} @ {} ({}): {} artifact(s)",
                    marker,
                    report.name,
                    display_version,
                    sha,
                    artifacts.len()
                ));
                lines.extend(
                    artifacts
                        .iter()
                        .map(|a| format!("     {}", a.path.display())),
                );
            }
            RepoOutcome::Unchanged {
                display_version,
                sha,
            } => lines.push(format!(
                "{} {} @ {} ({}): unchanged",
                marker, report.name, display_version, sha
            )),
            RepoOutcome::Failed { error } => {
                lines.push(format!("{} {}: {}", marker, report.name, error))
            }
        }
    }

    lines.push(format!(
        "   {} built, {} unchanged, {} failed",
        summary.built(),
        summary.unchanged(),
        summary.failed()
    ));
    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbuild::builder::Artifact;
    use crossbuild::error::Error;
    use crossbuild::orchestrator::RepoReport;
    use crossbuild::platform::Platform;
    use tempfile::TempDir;

    fn args(config: PathBuf) -> BuildArgs {
        BuildArgs {
            config,
            repo: Vec::new(),
            force: false,
            fail_fast: false,
        }
    }

    #[test]
    fn test_execute_missing_config() {
        let result = execute(args(PathBuf::from("/nonexistent/config.yaml")), "never");
        let message = result.unwrap_err().to_string();
        assert!(message.contains("cannot read /nonexistent/config.yaml"));
    }

    #[test]
    fn test_execute_invalid_config_runs_nothing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            format!(
                concat!(
                    "globals:\n  workspace_dir: {}\n",
                    "repos:\n  - name: a\n    git_url: u\n    platforms: [linux/amd64]\n",
                ),
                temp.path().join("ws").display()
            ),
        )
        .unwrap();

        let result = execute(args(path), "never");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("both version and branch are empty"));
        assert!(!temp.path().join("ws").exists());
    }

    #[test]
    fn test_execute_empty_repo_list() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "repos: []\n").unwrap();
        assert!(execute(args(path), "never").is_ok());
    }

    #[test]
    fn test_render_summary_plain() {
        let summary = RunSummary {
            reports: vec![
                RepoReport {
                    name: "demo".to_string(),
                    outcome: RepoOutcome::Built {
                        display_version: "v1.0.0".to_string(),
                        sha: "abc1234".to_string(),
                        artifacts: vec![Artifact {
                            platform: Platform::parse("linux/amd64").unwrap(),
                            path: PathBuf::from("/ws/demo/artifacts/demo-linux-amd64"),
                        }],
                    },
                },
                RepoReport {
                    name: "tool".to_string(),
                    outcome: RepoOutcome::Failed {
                        error: Error::GitCheckout {
                            r#ref: "v9".to_string(),
                            message: "no such ref".to_string(),
                        },
                    },
                },
            ],
        };

        let text = render_summary(&summary, &OutputConfig::from_env_and_flag("never"));
        assert!(text.contains("[BUILT] demo @ v1.0.0 (abc1234): 1 artifact(s)"));
        assert!(text.contains("     /ws/demo/artifacts/demo-linux-amd64"));
        assert!(text.contains("[FAIL] tool: Git checkout of v9 failed: no such ref"));
        assert!(text.contains("1 built, 0 unchanged, 1 failed"));
    }
}
