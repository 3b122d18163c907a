//! # Completions Command Implementation
//!
//! Generates shell completion scripts with `clap_complete` for every
//! `crossbuild` subcommand and flag.
//!
//! ## Supported Shells
//!
//! - **Bash**: save under `bash-completion/completions/`
//! - **Zsh**: save as `_crossbuild` somewhere on `fpath`
//! - **Fish**: save to `~/.config/fish/completions/crossbuild.fish`
//! - **PowerShell**, **Elvish**: source from the shell profile
//!
//! ## Example
//!
//! ```bash
//! crossbuild completions bash > ~/.local/share/bash-completion/completions/crossbuild
//! crossbuild completions zsh > ~/.zfunc/_crossbuild
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory, ValueEnum};
use clap_complete::{generate, Shell};
use std::io::{self, Write};

use crate::cli::Cli;

/// Shell types for completion generation
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    /// Bourne Again Shell
    Bash,
    /// Z Shell
    Zsh,
    /// Friendly interactive shell
    Fish,
    /// PowerShell
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::PowerShell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

/// Writes the completion script for `args.shell` to stdout.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut io::stdout())
}

/// Writes the script for `shell` to `out`.
fn write_completions(shell: CompletionShell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    generate(Shell::from(shell), &mut cmd, "crossbuild", out);
    Ok(())
}
