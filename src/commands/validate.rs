//! # Validate Command Implementation
//!
//! Loads, expands and validates the configuration file without touching any
//! repository, then prints what a build would do for each entry: the target
//! revision, toolchain, clone directory and platforms. Malformed platform
//! entries are reported as warnings (they are skipped at build time).
//!
//! With `--strict`, warnings fail the command.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crossbuild::config::{self, BuildCommand, RepoSpec};
use crossbuild::output::{emoji, OutputConfig};
use crossbuild::platform;
use crossbuild::resolve::RevisionSource;

use super::DEFAULT_CONFIG;

/// Validate a crossbuild configuration file
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the configuration file to validate.
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = DEFAULT_CONFIG,
        env = "CROSSBUILD_CONFIG"
    )]
    pub config: PathBuf,

    /// Use strict validation (fail on warnings).
    #[arg(long)]
    pub strict: bool,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    println!(
        "{} Validating configuration: {}",
        emoji(&out, "🔍", "[SCAN]"),
        args.config.display()
    );

    let cfg = match config::load(&args.config, &config::process_env()) {
        Ok(cfg) => cfg,
        Err(e) => {
            println!("{} {}", emoji(&out, "❌", "[ERR]"), e);
            return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
        }
    };

    println!(
        "{} {} repositories, default toolchain go{}",
        emoji(&out, "📊", "[INFO]"),
        cfg.repos.len(),
        cfg.globals.default_go_version
    );

    let mut warnings = 0;
    for repo in &cfg.repos {
        let (lines, repo_warnings) = describe_repo(repo, &out);
        for line in lines {
            println!("{}", line);
        }
        warnings += repo_warnings;
    }

    if warnings > 0 {
        println!(
            "\n{} {} warning(s)",
            emoji(&out, "⚠️", "[WARN]"),
            warnings
        );
        if args.strict {
            anyhow::bail!("Validation failed with {} warning(s) (--strict)", warnings);
        }
    } else {
        println!("\n{} Configuration is valid", emoji(&out, "✅", "[OK]"));
    }
    Ok(())
}

/// Summary lines for one repository and the number of warnings found.
fn describe_repo(repo: &RepoSpec, out: &OutputConfig) -> (Vec<String>, usize) {
    let (valid, invalid) = platform::partition(&repo.platforms);
    let source = match repo.target.source {
        RevisionSource::Version => "version",
        RevisionSource::Branch => "branch, latest tag used for display",
    };
    let build = match &repo.build {
        BuildCommand::Args(tokens) => shell_words::join(tokens),
        BuildCommand::Structured(_) => "structured build options".to_string(),
    };

    let mut lines = vec![
        format!("\n{} {}", emoji(out, "📦", "[REPO]"), repo.name),
        format!("   source:    {}", repo.git_url),
        format!("   revision:  {} ({})", repo.target, source),
        format!("   toolchain: go{}", repo.go_version),
        format!("   clone dir: {}", repo.repo_dir().display()),
        format!("   build:     {}", build),
        format!(
            "   platforms: {}",
            valid
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    ];
    for entry in &invalid {
        lines.push(format!(
            "   {} invalid platform {:?} will be skipped",
            emoji(out, "⚠️", "[WARN]"),
            entry
        ));
    }
    if valid.is_empty() {
        lines.push(format!(
            "   {} no valid platforms, nothing will be built",
            emoji(out, "⚠️", "[WARN]")
        ));
    }
    let warnings = invalid.len() + usize::from(valid.is_empty());
    (lines, warnings)
}
