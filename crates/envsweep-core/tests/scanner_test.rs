//! Scanner traversal: depth bounds, pruning, cycles, and bad roots.

mod common;

use std::fs;
use std::path::PathBuf;

use envsweep_core::scanner::PathScanner;
use tempfile::TempDir;

fn candidates(roots: &[PathBuf], max_depth: usize) -> Vec<PathBuf> {
    PathScanner::new(roots, max_depth).collect()
}

#[test]
fn yields_roots_and_descends_to_environments() {
    let dir = TempDir::new().unwrap();
    let projects = dir.path().join("projects");
    fs::create_dir_all(&projects).unwrap();
    let venv = common::make_venv(&projects, "venv1", "3.11.4");

    let found = candidates(&[dir.path().to_path_buf()], 4);
    assert!(found.contains(&dir.path().to_path_buf()));
    assert!(found.contains(&projects));
    assert!(found.contains(&venv));
    // Environment internals are not candidates
    assert!(!found.iter().any(|p| p.starts_with(venv.join(common::SCRIPTS))));
}

#[test]
fn depth_limit_is_enforced() {
    let dir = TempDir::new().unwrap();
    let deep = dir.path().join("a").join("b").join("c").join("d");
    fs::create_dir_all(&deep).unwrap();

    let found = candidates(&[dir.path().to_path_buf()], 2);
    assert!(found.contains(&dir.path().join("a")));
    assert!(found.contains(&dir.path().join("a").join("b")));
    assert!(!found.contains(&dir.path().join("a").join("b").join("c")));
}

#[test]
fn conda_envs_subdir_is_descended() {
    let dir = TempDir::new().unwrap();
    // A miniconda base is itself a conda environment; the real per-project
    // environments live under its envs/ directory.
    let base = common::make_conda(dir.path(), "miniconda3", "3.10.2");
    let nested = common::make_conda(&base.join("envs"), "proj", "3.10.2");
    fs::create_dir_all(base.join("pkgs").join("cache")).unwrap();

    let found = candidates(&[dir.path().to_path_buf()], 4);
    assert!(found.contains(&base));
    assert!(found.contains(&base.join("envs")));
    assert!(found.contains(&nested));
    // Other children of an environment root stay unvisited
    assert!(!found.contains(&base.join("pkgs")));
}

#[cfg(unix)]
#[test]
fn symlink_cycles_terminate() {
    let dir = TempDir::new().unwrap();
    let inner = dir.path().join("a");
    fs::create_dir_all(&inner).unwrap();
    std::os::unix::fs::symlink(dir.path(), inner.join("loop")).unwrap();

    let found = candidates(&[dir.path().to_path_buf()], 10);
    // The walk finishes and visits each real directory exactly once
    assert_eq!(
        found
            .iter()
            .filter(|p| fs::canonicalize(p).unwrap() == fs::canonicalize(&inner).unwrap())
            .count(),
        1
    );
}

#[test]
fn missing_root_yields_nothing() {
    let dir = TempDir::new().unwrap();
    let found = candidates(&[dir.path().join("not_there")], 4);
    assert!(found.is_empty());
}

#[test]
fn overlapping_roots_visit_once() {
    let dir = TempDir::new().unwrap();
    let projects = dir.path().join("projects");
    fs::create_dir_all(&projects).unwrap();

    let found = candidates(&[dir.path().to_path_buf(), projects.clone()], 4);
    assert_eq!(found.iter().filter(|p| **p == projects).count(), 1);
}
