//! Target platforms and artifact naming.

use std::fmt;

/// An `os/arch` build target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    /// Splits on the first `/`. Both halves must be non-empty.
    pub fn parse(spec: &str) -> Option<Self> {
        let (os, arch) = spec.trim().split_once('/')?;
        if os.is_empty() || arch.is_empty() {
            return None;
        }
        Some(Self {
            os: os.to_string(),
            arch: arch.to_string(),
        })
    }

    /// `<repo>-<os>-<arch>`, with `.exe` for Windows targets. A variant
    /// suffix in the arch (`arm/v7`) is joined with `-` as well.
    pub fn artifact_name(&self, repo: &str) -> String {
        let ext = if self.os == "windows" { ".exe" } else { "" };
        format!("{}-{}-{}{}", repo, self.os, self.arch.replace('/', "-"), ext)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Splits a platform list into parsed targets and rejected entries,
/// preserving order.
pub fn partition(specs: &[String]) -> (Vec<Platform>, Vec<String>) {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for spec in specs {
        match Platform::parse(spec) {
            Some(p) => valid.push(p),
            None => invalid.push(spec.clone()),
        }
    }
    (valid, invalid)
}
