//! # crossbuild
//!
//! Fetches, versions and cross-compiles a configured list of Go
//! repositories. For each repository it clones or updates a working copy,
//! resolves the revision to build, skips the build when the commit has not
//! changed since the last successful one, and otherwise builds one binary
//! per configured `os/arch` pair with a pinned toolchain.
//!
//! The library backs the `crossbuild` binary but can be driven directly:
//!
//! ```no_run
//! use crossbuild::config;
//! use crossbuild::orchestrator::{Orchestrator, RunOptions};
//! use crossbuild::process::SystemRunner;
//! use std::path::Path;
//!
//! let env = config::process_env();
//! let cfg = config::load(Path::new("config.yaml"), &env)?;
//! let summary = Orchestrator::new(&SystemRunner, &env).run(&cfg, &RunOptions::default())?;
//! assert!(summary.is_success());
//! # Ok::<(), crossbuild::error::Error>(())
//! ```
//!
//! ## Modules
//!
//! - **`config`**: YAML schema, environment expansion, validation.
//! - **`resolve`**: ordered fallback chains (version/branch, toolchain,
//!   workspace root).
//! - **`process`**: the `CommandRunner` seam over external commands.
//! - **`git`**, **`workspace`**: clone-or-update of working copies.
//! - **`marker`**: the persisted `.last_build_sha` change marker.
//! - **`platform`**, **`toolchain`**, **`builder`**: the multi-platform build.
//! - **`orchestrator`**: per-repository sequencing and the run summary.
//! - **`output`**: terminal styling for summaries.

pub mod builder;
pub mod config;
pub mod error;
pub mod git;
pub mod marker;
pub mod orchestrator;
pub mod output;
pub mod platform;
pub mod process;
pub mod resolve;
pub mod toolchain;
pub mod workspace;
