//! # CLI Command Implementations
//!
//! One module per subcommand. Each defines a `clap` `Args` struct and an
//! `execute` function that loads the configuration and calls into the
//! `crossbuild` library.

pub mod build;
pub mod completions;
pub mod status;
pub mod validate;

/// Default configuration file, looked up in the current directory.
pub const DEFAULT_CONFIG: &str = "config.yaml";
