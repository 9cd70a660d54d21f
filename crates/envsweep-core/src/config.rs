use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SweepError, SweepResult};
use crate::python::PythonVersion;

/// Configuration for one scan, snapshotted at scan start and never mutated
/// while the scan runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Ordered set of root directories to scan
    pub search_paths: Vec<PathBuf>,
    /// Maximum traversal depth below each search root
    pub max_depth: usize,
    /// Staleness threshold in days for the unused classification
    pub default_unused_days: u64,
    /// Confidence value in [0, 1] controlling the low-usage cutoff
    pub cleanup_confidence_threshold: f64,
    /// Include system Python installations in results
    pub show_system_environments: bool,
    /// Analyse candidate directories on a bounded worker pool
    pub parallel_analysis: bool,
    /// Cap on the cleanup-candidate list
    pub max_suggestions: usize,
    /// Latest stable Python line for the outdated rule; rule skipped when unset
    pub python_baseline: Option<PythonVersion>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            search_paths: default_search_paths(),
            max_depth: 4,
            default_unused_days: 90,
            cleanup_confidence_threshold: 0.7,
            show_system_environments: false,
            parallel_analysis: true,
            max_suggestions: 10,
            python_baseline: None,
        }
    }
}

impl SweepConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> SweepResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse configuration from its versioned JSON envelope
    pub fn from_json(contents: &str) -> SweepResult<Self> {
        let envelope: ConfigEnvelope = serde_json::from_str(contents)
            .map_err(|e| SweepError::config(format!("Failed to parse config: {}", e)))?;
        let major = envelope.schema_version.split('.').next().unwrap_or("");
        if major != "1" {
            return Err(SweepError::config(format!(
                "Unsupported config schema version: {}",
                envelope.schema_version
            )));
        }
        Ok(envelope.config)
    }

    /// Validate the configuration.
    ///
    /// This is the only fatal failure class: a scan never starts with an
    /// invalid configuration, and a scan that starts always completes.
    pub fn validate(&self) -> SweepResult<()> {
        if self.search_paths.is_empty() {
            return Err(SweepError::config("search_paths must not be empty"));
        }

        if !(0.0..=1.0).contains(&self.cleanup_confidence_threshold) {
            return Err(SweepError::config(format!(
                "cleanup_confidence_threshold must be within [0, 1], got {}",
                self.cleanup_confidence_threshold
            )));
        }

        if self.max_depth == 0 {
            return Err(SweepError::config("max_depth must be at least 1"));
        }

        Ok(())
    }
}

/// Versioned on-disk envelope wrapping the configuration.
///
/// Unknown keys inside `config` are tolerated so older engines can read
/// files written by newer tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigEnvelope {
    schema_version: String,
    config: SweepConfig,
}

/// Directories where Python environments conventionally live
fn default_search_paths() -> Vec<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    vec![
        home.join(".virtualenvs"),
        home.join("venvs"),
        home.join("envs"),
        home.join("miniconda3").join("envs"),
        home.join("anaconda3").join("envs"),
        home.join(".conda").join("envs"),
    ]
}
