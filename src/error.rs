//! # Error Handling
//!
//! This module defines the centralized error type for `crossbuild`. It uses
//! `thiserror` to build a single `Error` enum covering every failure the
//! library can report, each variant carrying enough context (repository
//! name, ref, platform) to produce a useful log line on its own.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Variants fall into three groups:
//!   - configuration errors (`ConfigParse`, `ConfigInvalid`, `BuildArgs`,
//!     `UnknownRepo`), which abort a run before any repository is touched;
//!   - correctness-critical command failures (`GitClone`, `GitCheckout`,
//!     `NotARepository`, `Build`), which fail the repository being processed;
//!   - plumbing errors (`Command`, `Io`, `Yaml`, `Regex`).
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Best-effort operations (fetch, pull, tag lookup, toolchain install, tidy)
//! still return `Error::Command` from the process layer; callers log and drop
//! those instead of propagating them.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for crossbuild operations
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file could not be read or parsed.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A repository entry failed validation.
    ///
    /// The index and name identify the offending entry in the `repos` list.
    #[error("repo[{index}] name={name}: {message}")]
    ConfigInvalid {
        index: usize,
        name: String,
        message: String,
    },

    /// An external command could not be spawned or exited unsuccessfully.
    #[error("Command failed: {command}: {message}")]
    Command { command: String, message: String },

    /// The initial clone of a repository failed.
    #[error("Git clone error for {url}@{r#ref}: {message}")]
    GitClone {
        url: String,
        r#ref: String,
        message: String,
    },

    /// The resolved revision could not be checked out in an existing clone.
    #[error("Git checkout of {r#ref} failed: {message}")]
    GitCheckout { r#ref: String, message: String },

    /// The clone directory exists but holds no version-control metadata.
    #[error("{} exists but is not a git repository", path.display())]
    NotARepository { path: PathBuf },

    /// A toolchain build for one platform failed.
    #[error("[{repo}][{platform}] build failed: {message}")]
    Build {
        repo: String,
        platform: String,
        message: String,
    },

    /// The build argument string could not be tokenized.
    #[error("Invalid build arguments: {message}")]
    BuildArgs { message: String },

    /// A repository name given on the command line is not configured.
    #[error("Unknown repository: {name}")]
    UnknownRepo { name: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
