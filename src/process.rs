//! # Process Runner
//!
//! Every external tool (git, the Go toolchain) is invoked through the
//! [`CommandRunner`] trait so the orchestration logic can be exercised in
//! tests without spawning processes. [`SystemRunner`] is the real
//! implementation over `std::process::Command`.
//!
//! An [`Invocation`] describes one synchronous call:
//!
//! - `dir`: working directory, `None` for the current process directory.
//! - `env`: `None` inherits the process environment. `Some(list)` replaces it
//!   entirely; entries are applied in order so a later entry for the same key
//!   wins.
//!
//! Two modes are supported. [`CommandRunner::run`] streams the child's
//! stdout/stderr to ours; [`CommandRunner::output`] captures stdout, trims it,
//! and discards stderr. In both modes a spawn failure or non-zero exit is an
//! [`Error::Command`]; whether that is fatal is the caller's decision.

use crate::error::{Error, Result};
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A single command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub dir: Option<PathBuf>,
    pub env: Option<Vec<(String, String)>>,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            dir: None,
            env: None,
        }
    }

    /// Runs the command inside `dir`.
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.dir = Some(dir.to_path_buf());
        self
    }

    /// Replaces the inherited environment with `env`.
    pub fn with_env(mut self, env: Vec<(String, String)>) -> Self {
        self.env = Some(env);
        self
    }

    /// Effective value of `key` in an explicit environment (last entry wins).
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .as_ref()?
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.dir {
            command.current_dir(dir);
        }
        if let Some(env) = &self.env {
            command.env_clear();
            for (key, value) in env {
                command.env(key, value);
            }
        }
        command
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Executes external commands.
pub trait CommandRunner {
    /// Runs with stdout/stderr forwarded to this process.
    fn run(&self, invocation: &Invocation) -> Result<()>;

    /// Runs and returns trimmed stdout; stderr is discarded.
    fn output(&self, invocation: &Invocation) -> Result<String>;
}

/// Runs commands on the host system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        debug!("run: {}", invocation);
        let status = invocation
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| command_error(invocation, e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(command_error(invocation, status.to_string()))
        }
    }

    fn output(&self, invocation: &Invocation) -> Result<String> {
        debug!("output: {}", invocation);
        let output = invocation
            .command()
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| command_error(invocation, e.to_string()))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(command_error(invocation, output.status.to_string()))
        }
    }
}

fn command_error(invocation: &Invocation, message: String) -> Error {
    Error::Command {
        command: invocation.to_string(),
        message,
    }
}
