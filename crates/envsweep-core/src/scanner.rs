//! Candidate enumeration under the configured search roots.
//!
//! An explicit worklist drives a breadth-first walk with a hard depth bound.
//! Symlink cycles are broken by a visited set of canonicalized paths, and an
//! unreadable subtree is logged and skipped without failing the scan.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::detect;
use crate::environment::EnvironmentKind;

/// Lazy walker producing candidate directories for the analysis pipeline.
///
/// Every visited directory is yielded as a candidate. Directories that are
/// themselves environment roots are not descended into, with one exception:
/// a conda root's `envs/` child, which holds nested environments under a
/// miniconda or anaconda base installation.
pub struct PathScanner {
    queue: VecDeque<(PathBuf, usize)>,
    visited: HashSet<PathBuf>,
    max_depth: usize,
    skipped: u64,
}

impl PathScanner {
    /// Create a scanner over the given roots with a maximum traversal depth
    pub fn new(roots: &[PathBuf], max_depth: usize) -> Self {
        let mut queue = VecDeque::new();
        for root in roots {
            if root.is_dir() {
                queue.push_back((root.clone(), 0));
            } else {
                debug!("search root not present: {}", root.display());
            }
        }
        Self {
            queue,
            visited: HashSet::new(),
            max_depth,
            skipped: 0,
        }
    }

    /// Directories skipped so far due to IO or permission errors
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    fn enqueue_children(&mut self, dir: &Path, depth: usize) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("skipping unreadable directory {}: {}", dir.display(), err);
                self.skipped += 1;
                return;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("skipping unreadable entry under {}: {}", dir.display(), err);
                    self.skipped += 1;
                    continue;
                }
            };
            if entry.path().is_dir() {
                self.queue.push_back((entry.path(), depth + 1));
            }
        }
    }
}

impl Iterator for PathScanner {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        while let Some((dir, depth)) = self.queue.pop_front() {
            // Cycle protection tracks real paths, so a symlink loop is
            // visited once and then dropped silently.
            let real = match fs::canonicalize(&dir) {
                Ok(real) => real,
                Err(err) => {
                    warn!("cannot resolve {}: {}", dir.display(), err);
                    self.skipped += 1;
                    continue;
                }
            };
            if !self.visited.insert(real) {
                debug!("already visited: {}", dir.display());
                continue;
            }

            match detect::detect(&dir) {
                Some(EnvironmentKind::Conda) => {
                    let envs = dir.join("envs");
                    if envs.is_dir() && depth < self.max_depth {
                        self.queue.push_back((envs, depth + 1));
                    }
                }
                Some(_) => {}
                None => {
                    if depth < self.max_depth {
                        self.enqueue_children(&dir, depth);
                    }
                }
            }

            return Some(dir);
        }
        None
    }
}
