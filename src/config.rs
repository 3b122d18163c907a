//! # Configuration Schema and Parsing
//!
//! This module defines the data structures that represent the crossbuild
//! configuration file and the three steps that turn it into something the
//! orchestrator can run:
//!
//! 1. **Parse** (`parse`, `from_file`): YAML into a [`RootConfig`].
//! 2. **Expand** (`expand`): environment-variable references in string fields
//!    are substituted against an explicit environment snapshot. Unset
//!    variables expand to the empty string.
//! 3. **Validate** (`validate`): required fields are checked and fallback
//!    chains are resolved, producing an immutable [`ValidatedConfig`].
//!
//! `build_args` and the structured `build` block are deliberately left
//! unexpanded: they reference variables such as `$OUTPUT` and `$SHORT_SHA`
//! that only exist in the per-platform build environment.
//!
//! ## Example
//!
//! ```yaml
//! globals:
//!   workspace_dir: ${HOME}/builds
//!   default_go_version: "1.24"
//! repos:
//!   - name: demo
//!     git_url: https://github.com/example/demo.git
//!     branch: main
//!     platforms: [linux/amd64, darwin/arm64]
//!     build_args: build -o $OUTPUT ./cmd/demo
//! ```

use crate::error::{Error, Result};
use crate::resolve::{self, Target};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Snapshot of environment variables used for expansion.
pub type EnvSnapshot = HashMap<String, String>;

/// Takes a snapshot of the current process environment.
pub fn process_env() -> EnvSnapshot {
    std::env::vars().collect()
}

/// Process-wide defaults
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GlobalConfig {
    /// Default workspace root; each repo is cloned to `<workspace_dir>/<name>`.
    #[serde(default)]
    pub workspace_dir: String,
    /// Toolchain version used by repos that do not set `go_version`.
    #[serde(default)]
    pub default_go_version: String,
}

/// Structured build options, used when `build_args` is empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildOptions {
    /// Build tags, joined with commas.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Linker flags; may reference build environment variables.
    #[serde(default)]
    pub ldflags: String,
    /// Pass `-trimpath`.
    #[serde(default)]
    pub trimpath: bool,
    /// Extra arguments placed after `-o <output>`; each may reference build
    /// environment variables.
    #[serde(default)]
    pub flags: Vec<String>,
    /// Package to build. Defaults to `.`.
    #[serde(default)]
    pub package: Option<String>,
}

/// One managed repository, as written in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RepoConfig {
    /// Clone directory name and artifact-name prefix.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub git_url: String,
    /// Explicit revision; takes precedence over `branch`.
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub branch: String,
    /// Toolchain override; falls back to `globals.default_go_version`.
    #[serde(default)]
    pub go_version: String,
    /// Ordered `os/arch` list.
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Raw toolchain arguments, tokenized with shell quoting rules.
    #[serde(default)]
    pub build_args: String,
    #[serde(default)]
    pub build: Option<BuildOptions>,
    /// Extra build environment, in declaration order.
    #[serde(default, deserialize_with = "deserialize_env")]
    pub env: Vec<(String, String)>,
}

/// Top-level configuration document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RootConfig {
    #[serde(default)]
    pub globals: GlobalConfig,
    #[serde(default)]
    pub repos: Vec<RepoConfig>,
}

/// How the toolchain build command line is assembled.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildCommand {
    /// Pre-tokenized `build_args`; each token is expanded per platform.
    Args(Vec<String>),
    /// Structured options from the `build` block (or defaults).
    Structured(BuildOptions),
}

/// A validated repository entry with all fallbacks resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoSpec {
    pub name: String,
    pub git_url: String,
    pub target: Target,
    pub go_version: String,
    pub workspace_root: PathBuf,
    pub platforms: Vec<String>,
    pub build: BuildCommand,
    pub env: Vec<(String, String)>,
}

impl RepoSpec {
    /// Clone directory for this repository.
    pub fn repo_dir(&self) -> PathBuf {
        self.workspace_root.join(&self.name)
    }
}

/// Configuration after expansion and validation. Immutable for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub globals: GlobalConfig,
    pub repos: Vec<RepoSpec>,
}

/// Parses a YAML string into a [`RootConfig`].
pub fn parse(yaml: &str) -> Result<RootConfig> {
    serde_yaml::from_str(yaml).map_err(|e| {
        let message = e.to_string();
        let hint = if message.contains("invalid type: floating point")
            || message.contains("invalid type: integer")
        {
            Some("quote version numbers, e.g. go_version: \"1.24\"".to_string())
        } else if message.contains("unknown field") {
            Some(
                "the build block accepts tags, ldflags, trimpath, flags and package".to_string(),
            )
        } else {
            None
        };
        Error::ConfigParse { message, hint }
    })
}

/// Reads and parses a configuration file.
pub fn from_file(path: &Path) -> Result<RootConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigParse {
        message: format!("cannot read {}: {}", path.display(), e),
        hint: if e.kind() == std::io::ErrorKind::NotFound {
            Some("pass --config or set CROSSBUILD_CONFIG".to_string())
        } else {
            None
        },
    })?;
    parse(&content)
}

/// Expands `$VAR` and `${VAR}` references against `env`.
///
/// Unset variables expand to the empty string.
pub fn expand_str(input: &str, env: &EnvSnapshot) -> String {
    shellexpand::env_with_context_no_errors(input, |var: &str| {
        Some(env.get(var).map(String::as_str).unwrap_or(""))
    })
    .into_owned()
}

/// Returns a copy of `root` with environment references expanded in every
/// string field except `build_args` and `build`.
pub fn expand(root: &RootConfig, env: &EnvSnapshot) -> RootConfig {
    let x = |s: &str| expand_str(s, env);
    RootConfig {
        globals: GlobalConfig {
            workspace_dir: x(&root.globals.workspace_dir),
            default_go_version: x(&root.globals.default_go_version),
        },
        repos: root
            .repos
            .iter()
            .map(|r| RepoConfig {
                name: x(&r.name),
                git_url: x(&r.git_url),
                version: x(&r.version),
                branch: x(&r.branch),
                go_version: x(&r.go_version),
                platforms: r.platforms.iter().map(|p| x(p)).collect(),
                build_args: r.build_args.clone(),
                build: r.build.clone(),
                env: r.env.iter().map(|(k, v)| (k.clone(), x(v))).collect(),
            })
            .collect(),
    }
}

/// Checks invariants and resolves fallbacks. Expects an expanded config.
pub fn validate(root: &RootConfig) -> Result<ValidatedConfig> {
    let go_version_re = Regex::new(r"^\d+\.\d+(\.\d+)?((rc|beta)\d+)?$")?;
    let mut globals = root.globals.clone();
    globals.default_go_version = resolve::resolve_go_version("", &globals.default_go_version);

    let mut seen = HashSet::new();
    let mut repos = Vec::with_capacity(root.repos.len());

    for (index, repo) in root.repos.iter().enumerate() {
        let invalid = |message: &str| Error::ConfigInvalid {
            index,
            name: repo.name.clone(),
            message: message.to_string(),
        };

        let name = repo.name.trim();
        if name.is_empty() {
            return Err(invalid("name is required"));
        }
        if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(invalid("name must be a plain directory name"));
        }
        if !seen.insert(name.to_string()) {
            return Err(invalid("name is already used by another repo"));
        }
        if repo.git_url.trim().is_empty() {
            return Err(invalid("git_url is required"));
        }
        let target = resolve::resolve_target(&repo.version, &repo.branch)
            .ok_or_else(|| invalid("both version and branch are empty"))?;
        if repo.platforms.is_empty() {
            return Err(invalid("platforms must be defined"));
        }

        let go_version = resolve::resolve_go_version(&repo.go_version, &globals.default_go_version);
        if !go_version_re.is_match(&go_version) {
            return Err(invalid(&format!(
                "go version {:?} is not a toolchain release (expected e.g. 1.24 or 1.22.3)",
                go_version
            )));
        }

        let build = if repo.build_args.trim().is_empty() {
            BuildCommand::Structured(repo.build.clone().unwrap_or_default())
        } else {
            let tokens = shell_words::split(&repo.build_args).map_err(|e| {
                invalid(&Error::BuildArgs { message: e.to_string() }.to_string())
            })?;
            BuildCommand::Args(tokens)
        };

        let workspace_override = repo
            .env
            .iter()
            .rev()
            .find(|(k, _)| k == "WORKSPACE")
            .map(|(_, v)| v.as_str());

        repos.push(RepoSpec {
            name: name.to_string(),
            git_url: repo.git_url.trim().to_string(),
            target,
            go_version,
            workspace_root: resolve::resolve_workspace_root(
                workspace_override,
                &globals.workspace_dir,
            ),
            platforms: repo.platforms.clone(),
            build,
            env: repo.env.clone(),
        });
    }

    Ok(ValidatedConfig { globals, repos })
}

/// Reads, expands and validates a configuration file.
pub fn load(path: &Path, env: &EnvSnapshot) -> Result<ValidatedConfig> {
    let root = from_file(path)?;
    validate(&expand(&root, env))
}

fn scalar_to_string(value: serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Null => Some(String::new()),
        _ => None,
    }
}

fn deserialize_env<'de, D>(deserializer: D) -> std::result::Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    let mapping = Option::<serde_yaml::Mapping>::deserialize(deserializer)?.unwrap_or_default();
    mapping
        .into_iter()
        .map(|(k, v)| {
            let key = scalar_to_string(k)
                .ok_or_else(|| D::Error::custom("env keys must be scalars"))?;
            let value = scalar_to_string(v).ok_or_else(|| {
                D::Error::custom(format!("env value for {} must be a scalar", key))
            })?;
            Ok((key, value))
        })
        .collect()
}
