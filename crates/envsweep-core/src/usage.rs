use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SweepResult;

/// Activation history for one environment path.
///
/// Owned by the usage tracker; the engine only ever reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Activation timestamps, oldest first
    #[serde(default, deserialize_with = "de_timestamps")]
    pub activations: Vec<DateTime<Utc>>,
    /// Package-change timestamps, oldest first
    #[serde(default, deserialize_with = "de_timestamps")]
    pub package_changes: Vec<DateTime<Utc>>,
    /// When the environment was first observed
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub first_seen: Option<DateTime<Utc>>,
}

impl UsageRecord {
    /// Get the most recent activation timestamp
    pub fn last_activation(&self) -> Option<DateTime<Utc>> {
        self.activations.last().copied()
    }

    /// Get the most recent package-change timestamp
    pub fn last_package_change(&self) -> Option<DateTime<Utc>> {
        self.package_changes.last().copied()
    }

    /// Get the number of recorded activations
    pub fn activation_count(&self) -> u64 {
        self.activations.len() as u64
    }
}

/// Read-only view onto the usage tracker's activation history.
///
/// The engine joins this data in at classification time and never writes it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsageSource: Send + Sync {
    /// Look up the usage record for an environment path
    async fn lookup(&self, path: &Path) -> Option<UsageRecord>;
}

/// Usage history backed by the tracker's JSON log, keyed by environment path
#[derive(Debug, Clone, Default)]
pub struct UsageLog {
    records: HashMap<PathBuf, UsageRecord>,
}

impl UsageLog {
    /// Create an empty usage log for scans without history
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a usage log from in-memory records
    pub fn new(records: HashMap<PathBuf, UsageRecord>) -> Self {
        Self { records }
    }

    /// Load the usage log from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> SweepResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse the usage log from its JSON representation
    pub fn from_json(contents: &str) -> SweepResult<Self> {
        let records: HashMap<PathBuf, UsageRecord> = serde_json::from_str(contents)?;
        Ok(Self { records })
    }

    /// Conventional on-disk location of the usage log
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("envsweep")
            .join("usage.json")
    }

    /// Get the number of tracked paths
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether any paths are tracked
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl UsageSource for UsageLog {
    async fn lookup(&self, path: &Path) -> Option<UsageRecord> {
        self.records.get(path).cloned()
    }
}

/// Parse one timestamp, accepting RFC 3339 or the naive ISO-8601 form the
/// usage tracker has historically written ("2023-01-01T10:00:00").
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| format!("invalid timestamp {:?}: {}", raw, e))
}

fn de_timestamps<'de, D>(deserializer: D) -> Result<Vec<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    raw.iter()
        .map(|s| parse_timestamp(s).map_err(serde::de::Error::custom))
        .collect()
}

fn de_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
