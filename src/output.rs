//! # Output Configuration
//!
//! Controls how run summaries look on the terminal. Status markers are
//! emoji when colors are available and bracketed words otherwise, so logs
//! captured from CI stay greppable.
//!
//! The following are respected:
//! - `--color=never|always|auto`
//! - `NO_COLOR` (any value, including empty)
//! - `CLICOLOR=0`, `CLICOLOR_FORCE=1`
//! - `TERM=dumb`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crossbuild::output::{emoji, OutputConfig};
//!
//! let out = OutputConfig::from_env_and_flag("auto");
//! println!("{} Build summary", emoji(&out, "📊", "[INFO]"));
//! ```

use crate::orchestrator::RepoOutcome;
use std::env;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and the `--color` flag.
    ///
    /// # Behavior
    /// - `always`: styling on, even when `NO_COLOR` is set
    /// - `never`: styling off
    /// - anything else: auto-detect
    ///
    /// Auto-detection turns styling off for `NO_COLOR`, `CLICOLOR=0`,
    /// `TERM=dumb`, or a stdout that is not a terminal. `CLICOLOR_FORCE`
    /// turns it on regardless of the terminal.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    /// Inspect the environment and the stdout terminal.
    fn detect_color_support() -> bool {
        // Presence alone disables colors, even when empty.
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        // TTY and capability check
        console::Term::stdout().features().colors_supported()
    }

    /// Styling forced on.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Styling forced off.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

/// Returns `emoji_str` when colors are enabled, `plain` otherwise.
///
/// # Arguments
/// * `config` - The output configuration
/// * `emoji_str` - Shown on styled terminals
/// * `plain` - Bracketed fallback for plain output and captured logs
///
/// # Example
/// ```rust,ignore
/// let out = OutputConfig::from_env_and_flag("never");
/// assert_eq!(emoji(&out, "✅", "[OK]"), "[OK]");
/// ```
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Status marker for a repository outcome in the build summary.
///
/// Plain markers are `[BUILT]`, `[SKIP]` and `[FAIL]`.
pub fn outcome_marker(config: &OutputConfig, outcome: &RepoOutcome) -> &'static str {
    match outcome {
        RepoOutcome::Built { .. } => emoji(config, "✅", "[BUILT]"),
        RepoOutcome::Unchanged { .. } => emoji(config, "⏭️", "[SKIP]"),
        RepoOutcome::Failed { .. } => emoji(config, "❌", "[FAIL]"),
    }
}
