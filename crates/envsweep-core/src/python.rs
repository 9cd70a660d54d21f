use std::cmp::Ordering;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{SweepError, SweepResult};

/// Python version specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PythonVersion {
    major: u8,
    minor: u8,
    patch: Option<u8>,
}

impl PythonVersion {
    /// Create a new Python version
    pub fn new(major: u8, minor: u8, patch: Option<u8>) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Get the major version
    pub fn major(&self) -> u8 {
        self.major
    }

    /// Get the minor version
    pub fn minor(&self) -> u8 {
        self.minor
    }

    /// Get the patch version
    pub fn patch(&self) -> Option<u8> {
        self.patch
    }

    pub fn parse(version: &str) -> SweepResult<Self> {
        Self::from_str(version)
    }

    /// Pull the first `X.Y` or `X.Y.Z` version out of free-form text.
    ///
    /// Handles interpreter banners ("Python 3.9.7"), pyvenv.cfg values, and
    /// virtualenv's extended form ("3.11.4.final.0").
    pub fn extract(text: &str) -> Option<Self> {
        let re = Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").ok()?;
        let caps = re.captures(text)?;
        let major = caps.get(1)?.as_str().parse().ok()?;
        let minor = caps.get(2)?.as_str().parse().ok()?;
        let patch = match caps.get(3) {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };
        Some(Self::new(major, minor, patch))
    }

    /// Whether this version's minor line trails `baseline` by more than two.
    ///
    /// An older major version always trails.
    pub fn trails(&self, baseline: &PythonVersion) -> bool {
        if self.major < baseline.major {
            return true;
        }
        self.major == baseline.major && baseline.minor.saturating_sub(self.minor) > 2
    }
}

impl FromStr for PythonVersion {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        match parts.len() {
            2 => Ok(Self::new(
                parts[0].parse().map_err(|_| SweepError::version("Invalid major version"))?,
                parts[1].parse().map_err(|_| SweepError::version("Invalid minor version"))?,
                None,
            )),
            3 => Ok(Self::new(
                parts[0].parse().map_err(|_| SweepError::version("Invalid major version"))?,
                parts[1].parse().map_err(|_| SweepError::version("Invalid minor version"))?,
                Some(parts[2].parse().map_err(|_| SweepError::version("Invalid patch version"))?),
            )),
            _ => Err(SweepError::version("Invalid Python version format")),
        }
    }
}

impl std::fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

impl PartialOrd for PythonVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PythonVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.major.cmp(&other.major) {
            Ordering::Equal => match self.minor.cmp(&other.minor) {
                Ordering::Equal => match (self.patch, other.patch) {
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => Ordering::Less,
                    (Some(_), None) => Ordering::Greater,
                    (Some(a), Some(b)) => a.cmp(&b),
                },
                ord => ord,
            },
            ord => ord,
        }
    }
}
