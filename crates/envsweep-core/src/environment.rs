use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::python::PythonVersion;

/// Kind of Python environment rooted at a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentKind {
    /// Standard-library venv (writes pyvenv.cfg)
    Venv,
    /// Legacy virtualenv (predates pyvenv.cfg)
    Virtualenv,
    /// Conda environment (conda-meta directory)
    Conda,
    /// System Python installation
    System,
    /// Could not be classified
    Unknown,
}

impl EnvironmentKind {
    /// Get the lowercase display name
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentKind::Venv => "venv",
            EnvironmentKind::Virtualenv => "virtualenv",
            EnvironmentKind::Conda => "conda",
            EnvironmentKind::System => "system",
            EnvironmentKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health verdict for a discovered environment.
///
/// Variant order is the sort order: healthiest first, unclassifiable last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Working and in use
    Healthy,
    /// Working but on a Python line well behind the configured baseline
    Outdated,
    /// Working but stale and rarely activated
    Unused,
    /// Interpreter missing, version undetectable, or structure inconsistent
    Broken,
    /// Metadata extraction failed entirely
    Unknown,
}

impl HealthStatus {
    /// Get the lowercase display name
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Outdated => "outdated",
            HealthStatus::Unused => "unused",
            HealthStatus::Broken => "broken",
            HealthStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discovered environment, produced fresh on every scan.
///
/// `path` is the unique key within a single scan's result set. The health
/// verdict is derived purely from the other fields plus configured
/// thresholds, never set arbitrarily.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    /// Display name, derived from the final path component
    pub name: String,
    /// Environment root (or interpreter path for system installations)
    pub path: PathBuf,
    /// Detected kind
    pub kind: EnvironmentKind,
    /// Interpreter version, absent when undetectable
    pub python_version: Option<PythonVersion>,
    /// Recursive size of the environment in bytes, symlinks not followed
    pub size_bytes: u64,
    /// Number of top-level installed package metadata entries
    pub package_count: usize,
    /// Derived health verdict
    pub health: HealthStatus,
    /// Days since last activation, falling back to filesystem mtime
    pub days_since_used: u64,
    /// Activation count from usage history
    pub activation_count: u64,
    /// Warnings collected during degraded extraction
    #[serde(default)]
    pub warnings: Vec<String>,
}
