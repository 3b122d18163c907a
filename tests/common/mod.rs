//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_config(configs::MINIMAL);
//!     fixture.command().arg("validate").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::TestFixture;
}

/// Common configuration YAML snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// One repository tracking a branch, one platform.
    pub const MINIMAL: &str = r#"
repos:
  - name: demo
    git_url: https://example.com/demo.git
    branch: main
    platforms: [linux/amd64]
"#;

    /// A malformed platform entry, which validation reports as a warning.
    pub const BAD_PLATFORM: &str = r#"
repos:
  - name: demo
    git_url: https://example.com/demo.git
    branch: main
    platforms: [linux/amd64, darwin]
"#;

    /// Neither version nor branch set.
    pub const NO_REVISION: &str = r#"
repos:
  - name: demo
    git_url: https://example.com/demo.git
    platforms: [linux/amd64]
"#;

    /// Two entries with the same name.
    pub const DUPLICATE_NAMES: &str = r#"
repos:
  - name: demo
    git_url: https://example.com/a.git
    branch: main
    platforms: [linux/amd64]
  - name: demo
    git_url: https://example.com/b.git
    branch: main
    platforms: [linux/amd64]
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "repos: [unclosed";

    /// No repositories at all.
    pub const EMPTY: &str = "repos: []\n";
}

/// A temporary directory with an optional `config.yaml`.
///
/// ```rust,ignore
/// let fixture = TestFixture::new().with_config(configs::MINIMAL);
/// fixture.command().arg("status").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `config.yaml` with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child("config.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Add a file with the given path and content.
    #[allow(dead_code)]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the config file.
    #[allow(dead_code)]
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("config.yaml")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    ///
    /// `CROSSBUILD_CONFIG` is removed so the caller's environment cannot
    /// redirect the binary to another file.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("crossbuild");
        cmd.current_dir(self.path())
            .env_remove("CROSSBUILD_CONFIG")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Run git in `dir`, panicking with its stderr on failure.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(["-c", "user.name=crossbuild", "-c", "user.email=ci@example.com"])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to spawn git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Create a git repository at `dir` with one commit on `main`.
#[allow(dead_code)]
pub fn init_upstream(dir: &Path) {
    std::fs::create_dir_all(dir).expect("Failed to create upstream dir");
    git(dir, &["init", "-q"]);
    git(dir, &["checkout", "-q", "-b", "main"]);
    std::fs::write(dir.join("main.go"), "package main\n\nfunc main() {}\n")
        .expect("Failed to write main.go");
    git(dir, &["add", "."]);
    git(dir, &["commit", "-q", "-m", "initial"]);
}

/// Add a commit touching `file` to the repository at `dir`.
#[allow(dead_code)]
pub fn commit_change(dir: &Path, file: &str, content: &str) {
    std::fs::write(dir.join(file), content).expect("Failed to write file");
    git(dir, &["add", "."]);
    git(dir, &["commit", "-q", "-m", &format!("update {}", file)]);
}

/// Install fake `go` and `go<version>` executables in `bin`.
///
/// The versioned binary accepts `download` and `mod tidy`. For `build` it
/// writes `$GOOS/$GOARCH $SHORT_SHA` to the `-o` path and appends the
/// platform to `build.log` next to `bin`. Platforms listed in `failing`
/// exit with status 2 instead.
#[cfg(unix)]
#[allow(dead_code)]
pub fn install_fake_go(bin: &Path, version: &str, failing: &[&str]) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::create_dir_all(bin).expect("Failed to create bin dir");
    let log = bin.with_file_name("build.log");
    let failing_cases: String = failing
        .iter()
        .map(|p| format!("    {}) echo \"cannot build {}\" >&2; exit 2 ;;\n", p, p))
        .collect();

    let versioned = format!(
        r#"#!/bin/sh
set -e
if [ "$1" != "build" ]; then
  exit 0
fi
case "$GOOS/$GOARCH" in
{failing_cases}esac
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then
    out="$2"
    shift
  fi
  shift
done
[ -n "$out" ] || exit 3
printf '%s/%s %s\n' "$GOOS" "$GOARCH" "$SHORT_SHA" > "$out"
echo "$GOOS/$GOARCH" >> "{log}"
"#,
        failing_cases = failing_cases,
        log = log.display()
    );

    for (name, body) in [
        ("go".to_string(), "#!/bin/sh\nexit 0\n".to_string()),
        (format!("go{}", version), versioned),
    ] {
        let path = bin.join(name);
        std::fs::write(&path, body).expect("Failed to write fake go");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod fake go");
    }
}

/// `PATH` with `bin` prepended.
#[allow(dead_code)]
pub fn path_with(bin: &Path) -> String {
    match std::env::var("PATH") {
        Ok(path) if !path.is_empty() => format!("{}:{}", bin.display(), path),
        _ => bin.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_config() {
        let fixture = TestFixture::new().with_config("repos: []");
        assert!(fixture.config_path().exists());
    }

    #[test]
    fn test_configs_are_valid_yaml() {
        for config in [
            configs::MINIMAL,
            configs::BAD_PLATFORM,
            configs::NO_REVISION,
            configs::DUPLICATE_NAMES,
            configs::EMPTY,
        ] {
            serde_yaml::from_str::<serde_yaml::Value>(config).expect("Config should be valid YAML");
        }
    }

    #[test]
    fn test_invalid_yaml_is_actually_invalid() {
        assert!(serde_yaml::from_str::<serde_yaml::Value>(configs::INVALID_YAML).is_err());
    }
}
