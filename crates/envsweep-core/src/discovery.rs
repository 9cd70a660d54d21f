//! Scan orchestration: the per-scan context and the bounded worker pool.
//!
//! Each candidate directory runs an independent detect, extract, classify
//! pipeline. Workers pull candidates from the lazy scanner through a bounded
//! channel and push finished records to a single aggregating consumer that
//! owns the registry, so no mutable state is shared between workers.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SweepConfig;
use crate::detect;
use crate::environment::{EnvironmentInfo, EnvironmentKind};
use crate::error::{SweepError, SweepResult};
use crate::health;
use crate::metadata::{self, EnvironmentFacts};
use crate::registry::EnvironmentRegistry;
use crate::scanner::PathScanner;
use crate::usage::UsageSource;

/// Upper bound on concurrent analysis workers, regardless of core count
const MAX_WORKERS: usize = 8;
/// Capacity of the candidate and result channels
const CHANNEL_CAPACITY: usize = 128;

/// Immutable state threaded through one scan.
///
/// Created fresh per scan; nothing here outlives the invocation and nothing
/// is process-global.
pub struct ScanContext {
    /// Scan identifier attached to log events
    pub scan_id: Uuid,
    /// Configuration snapshot
    pub config: SweepConfig,
    /// Read-only usage history
    pub usage: Arc<dyn UsageSource>,
    /// Scan start, the staleness reference point
    pub now: DateTime<Utc>,
}

/// Entry point for environment discovery
pub struct DiscoveryEngine {
    context: Arc<ScanContext>,
}

impl DiscoveryEngine {
    /// Create an engine for one scan.
    ///
    /// Configuration is validated here, before any directory is touched;
    /// this is the only fatal failure path.
    pub fn new(config: SweepConfig, usage: Arc<dyn UsageSource>) -> SweepResult<Self> {
        config.validate()?;
        Ok(Self {
            context: Arc::new(ScanContext {
                scan_id: Uuid::new_v4(),
                config,
                usage,
                now: Utc::now(),
            }),
        })
    }

    /// Get the scan context
    pub fn context(&self) -> &ScanContext {
        &self.context
    }

    /// Run a full scan
    pub async fn scan(&self) -> SweepResult<EnvironmentRegistry> {
        self.scan_with_deadline(None).await
    }

    /// Run a scan with an optional wall-clock budget.
    ///
    /// When the budget runs out, in-flight workers finish their current
    /// directory and no new directories are dispatched.
    pub async fn scan_with_deadline(
        &self,
        budget: Option<Duration>,
    ) -> SweepResult<EnvironmentRegistry> {
        let started = Instant::now();
        let ctx = &self.context;
        info!(
            scan_id = %ctx.scan_id,
            roots = ctx.config.search_paths.len(),
            parallel = ctx.config.parallel_analysis,
            "starting environment scan"
        );

        let mut registry = if ctx.config.parallel_analysis {
            self.scan_parallel(started, budget).await?
        } else {
            self.scan_sequential(started, budget).await
        };

        if ctx.config.show_system_environments {
            collect_system_interpreters(ctx, &mut registry).await;
        }

        info!(
            scan_id = %ctx.scan_id,
            found = registry.len(),
            skipped = registry.skipped_dirs(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "environment scan complete"
        );
        Ok(registry)
    }

    async fn scan_sequential(
        &self,
        started: Instant,
        budget: Option<Duration>,
    ) -> EnvironmentRegistry {
        let ctx = &self.context;
        let mut registry = EnvironmentRegistry::new();
        let mut scanner = PathScanner::new(&ctx.config.search_paths, ctx.config.max_depth);

        for dir in scanner.by_ref() {
            if out_of_time(started, budget) {
                warn!(scan_id = %ctx.scan_id, "scan budget exhausted, stopping dispatch");
                break;
            }
            if let Some(record) = analyze_candidate(ctx, dir).await {
                registry.insert(record);
            }
        }

        registry.record_skipped(scanner.skipped());
        registry
    }

    async fn scan_parallel(
        &self,
        started: Instant,
        budget: Option<Duration>,
    ) -> SweepResult<EnvironmentRegistry> {
        let (candidate_tx, candidate_rx) = mpsc::channel::<PathBuf>(CHANNEL_CAPACITY);
        let candidate_rx = Arc::new(Mutex::new(candidate_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<EnvironmentInfo>(CHANNEL_CAPACITY);

        // Producer walks the lazy scanner on the blocking pool and feeds the
        // bounded candidate channel. Once the budget is spent it stops
        // dispatching and in-flight workers drain.
        let roots = self.context.config.search_paths.clone();
        let max_depth = self.context.config.max_depth;
        let producer = tokio::task::spawn_blocking(move || {
            let mut scanner = PathScanner::new(&roots, max_depth);
            for dir in scanner.by_ref() {
                if out_of_time(started, budget) {
                    warn!("scan budget exhausted, stopping dispatch");
                    break;
                }
                if candidate_tx.blocking_send(dir).is_err() {
                    break;
                }
            }
            scanner.skipped()
        });

        let worker_count = worker_pool_size();
        debug!(workers = worker_count, "starting analysis workers");
        let mut workers = Vec::with_capacity(worker_count);
        for _ in 0..worker_count {
            let rx = Arc::clone(&candidate_rx);
            let tx = result_tx.clone();
            let ctx = Arc::clone(&self.context);
            workers.push(tokio::spawn(async move {
                loop {
                    // Hold the receiver lock only for the recv itself
                    let dir = { rx.lock().await.recv().await };
                    let Some(dir) = dir else { break };
                    if let Some(record) = analyze_candidate(&ctx, dir).await {
                        if tx.send(record).await.is_err() {
                            break;
                        }
                    }
                }
            }));
        }
        drop(result_tx);

        // Single aggregating consumer; the registry is never shared.
        let mut registry = EnvironmentRegistry::new();
        while let Some(record) = result_rx.recv().await {
            registry.insert(record);
        }

        let skipped = producer
            .await
            .map_err(|err| SweepError::scan(format!("scan walker failed: {}", err)))?;
        registry.record_skipped(skipped);
        for worker in workers {
            worker
                .await
                .map_err(|err| SweepError::scan(format!("analysis worker failed: {}", err)))?;
        }

        Ok(registry)
    }
}

/// Run the detect, extract, classify pipeline for one candidate directory.
///
/// Returns `None` for directories that are not environments. Extraction
/// failures degrade the record per field; they never drop it.
async fn analyze_candidate(ctx: &ScanContext, dir: PathBuf) -> Option<EnvironmentInfo> {
    let kind = detect::detect(&dir)?;
    debug!(scan_id = %ctx.scan_id, kind = %kind, "detected environment at {}", dir.display());

    let facts = {
        let root = dir.clone();
        match tokio::task::spawn_blocking(move || metadata::extract(&root, kind)).await {
            Ok(facts) => facts,
            Err(err) => EnvironmentFacts::unavailable(format!("metadata pass failed: {}", err)),
        }
    };

    Some(build_record(ctx, dir, kind, facts).await)
}

/// Join usage history and classify, producing the final record
async fn build_record(
    ctx: &ScanContext,
    path: PathBuf,
    kind: EnvironmentKind,
    facts: EnvironmentFacts,
) -> EnvironmentInfo {
    let usage = ctx.usage.lookup(&path).await;
    let days_since_used = health::days_since_used(usage.as_ref(), facts.modified, ctx.now);
    let activation_count = usage.as_ref().map(|u| u.activation_count()).unwrap_or(0);
    let health = health::classify(kind, &facts, days_since_used, activation_count, &ctx.config);

    EnvironmentInfo {
        name: display_name(&path),
        path,
        kind,
        python_version: facts.python_version,
        size_bytes: facts.size_bytes,
        package_count: facts.package_count,
        health,
        days_since_used,
        activation_count,
        warnings: facts.warnings,
    }
}

/// Append system Python installations to the registry
async fn collect_system_interpreters(ctx: &ScanContext, registry: &mut EnvironmentRegistry) {
    let interpreters = match detect::find_system_interpreters() {
        Ok(interpreters) => interpreters,
        Err(err) => {
            warn!(scan_id = %ctx.scan_id, "system interpreter discovery failed: {}", err);
            return;
        }
    };

    for interpreter in interpreters {
        let facts = {
            let path = interpreter.clone();
            match tokio::task::spawn_blocking(move || metadata::extract_system(&path)).await {
                Ok(facts) => facts,
                Err(err) => EnvironmentFacts::unavailable(format!("metadata pass failed: {}", err)),
            }
        };
        let record = build_record(ctx, interpreter, EnvironmentKind::System, facts).await;
        registry.insert(record);
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn worker_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .min(MAX_WORKERS)
}

fn out_of_time(started: Instant, budget: Option<Duration>) -> bool {
    budget.is_some_and(|b| started.elapsed() >= b)
}
