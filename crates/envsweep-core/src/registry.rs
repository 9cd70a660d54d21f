//! Aggregated scan results.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::warn;

use crate::environment::{EnvironmentInfo, EnvironmentKind, HealthStatus};

/// Sort key for registry views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    SizeBytes,
    DaysSinceUsed,
    Health,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Final ordered result set of one scan.
///
/// Assembled by the scan's single aggregating consumer, read-only once the
/// scan completes. Holds results only for the duration of one invocation;
/// there is no cross-scan state.
#[derive(Debug, Default)]
pub struct EnvironmentRegistry {
    environments: Vec<EnvironmentInfo>,
    paths: HashSet<PathBuf>,
    skipped_dirs: u64,
}

impl EnvironmentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record, enforcing path uniqueness within the result set
    pub fn insert(&mut self, record: EnvironmentInfo) {
        if !self.paths.insert(record.path.clone()) {
            warn!("duplicate environment path dropped: {}", record.path.display());
            return;
        }
        self.environments.push(record);
    }

    pub(crate) fn record_skipped(&mut self, count: u64) {
        self.skipped_dirs += count;
    }

    /// Get the number of discovered environments
    pub fn len(&self) -> usize {
        self.environments.len()
    }

    /// Check whether the scan found anything
    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    /// Directories skipped during the scan due to IO or permission errors
    pub fn skipped_dirs(&self) -> u64 {
        self.skipped_dirs
    }

    /// Get the records in discovery order
    pub fn environments(&self) -> &[EnvironmentInfo] {
        &self.environments
    }

    /// Consume the registry, yielding the records in discovery order
    pub fn into_environments(self) -> Vec<EnvironmentInfo> {
        self.environments
    }

    /// Get the records sorted by `key` in `order`.
    ///
    /// Ties always break by path ascending, so equal keys produce a
    /// deterministic order regardless of discovery order.
    pub fn sorted(&self, key: SortKey, order: SortOrder) -> Vec<&EnvironmentInfo> {
        let mut records: Vec<&EnvironmentInfo> = self.environments.iter().collect();
        records.sort_by(|a, b| {
            let cmp = match key {
                SortKey::Name => a.name.cmp(&b.name),
                SortKey::SizeBytes => a.size_bytes.cmp(&b.size_bytes),
                SortKey::DaysSinceUsed => a.days_since_used.cmp(&b.days_since_used),
                SortKey::Health => a.health.cmp(&b.health),
            };
            let cmp = match order {
                SortOrder::Ascending => cmp,
                SortOrder::Descending => cmp.reverse(),
            };
            cmp.then_with(|| a.path.cmp(&b.path))
        });
        records
    }

    /// Get the records of one kind
    pub fn filter_by_kind(&self, kind: EnvironmentKind) -> Vec<&EnvironmentInfo> {
        self.environments.iter().filter(|e| e.kind == kind).collect()
    }

    /// Get the records with one health verdict
    pub fn filter_by_health(&self, health: HealthStatus) -> Vec<&EnvironmentInfo> {
        self.environments.iter().filter(|e| e.health == health).collect()
    }

    /// Get the records unused for at least `days` days
    pub fn filter_min_days_unused(&self, days: u64) -> Vec<&EnvironmentInfo> {
        self.environments
            .iter()
            .filter(|e| e.days_since_used >= days)
            .collect()
    }

    /// Get the cleanup-candidate view: broken environments first, then
    /// unused ones, larger first within each group, capped at `max`.
    ///
    /// System interpreters never appear here.
    pub fn cleanup_candidates(&self, max: usize) -> Vec<&EnvironmentInfo> {
        let mut candidates: Vec<&EnvironmentInfo> = self
            .environments
            .iter()
            .filter(|e| {
                e.kind != EnvironmentKind::System
                    && matches!(e.health, HealthStatus::Broken | HealthStatus::Unused)
            })
            .collect();
        candidates.sort_by(|a, b| {
            let rank = |h: HealthStatus| match h {
                HealthStatus::Broken => 0u8,
                _ => 1u8,
            };
            rank(a.health)
                .cmp(&rank(b.health))
                .then_with(|| b.size_bytes.cmp(&a.size_bytes))
                .then_with(|| a.path.cmp(&b.path))
        });
        candidates.truncate(max);
        candidates
    }
}
