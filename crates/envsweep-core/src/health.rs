//! Health classification rules.
//!
//! Precedence, first match wins: broken, outdated, unused, healthy. A broken
//! environment is never merely unused, and a working-but-abandoned one is
//! the primary cleanup target. Classification is a pure function of the
//! extracted facts, the usage view, and the configured thresholds.

use chrono::{DateTime, Utc};

use crate::config::SweepConfig;
use crate::environment::{EnvironmentKind, HealthStatus};
use crate::metadata::EnvironmentFacts;
use crate::usage::UsageRecord;

/// Days since the environment was last used.
///
/// The most recent activation wins; the root's mtime is the fallback when no
/// usage history exists. With neither signal the environment counts as
/// freshly used rather than stale.
pub fn days_since_used(
    usage: Option<&UsageRecord>,
    modified: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> u64 {
    let last = usage.and_then(|record| record.last_activation()).or(modified);
    match last {
        Some(ts) => (now - ts).num_days().max(0) as u64,
        None => 0,
    }
}

/// Activation-count cutoff below which staleness counts as disuse:
/// floor((1 - threshold) * 10), threshold clamped to [0, 1]
pub fn low_usage_cutoff(threshold: f64) -> u64 {
    let t = threshold.clamp(0.0, 1.0);
    ((1.0 - t) * 10.0).floor() as u64
}

/// Classify one environment's health
pub fn classify(
    kind: EnvironmentKind,
    facts: &EnvironmentFacts,
    days_since_used: u64,
    activation_count: u64,
    config: &SweepConfig,
) -> HealthStatus {
    if facts.unavailable {
        return HealthStatus::Unknown;
    }

    // System interpreters are never cleanup candidates; staleness rules do
    // not apply to them.
    if kind == EnvironmentKind::System {
        return if facts.python_version.is_some() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Broken
        };
    }

    if facts.structurally_broken || facts.interpreter.is_none() || facts.python_version.is_none() {
        return HealthStatus::Broken;
    }

    if let (Some(version), Some(baseline)) = (&facts.python_version, &config.python_baseline) {
        if version.trails(baseline) {
            return HealthStatus::Outdated;
        }
    }

    if days_since_used > config.default_unused_days
        && activation_count <= low_usage_cutoff(config.cleanup_confidence_threshold)
    {
        return HealthStatus::Unused;
    }

    HealthStatus::Healthy
}
