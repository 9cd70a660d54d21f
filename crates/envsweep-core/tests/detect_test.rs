//! Detector precedence over realistic directory layouts.

mod common;

use std::fs;

use envsweep_core::detect::{detect, find_interpreter};
use envsweep_core::environment::EnvironmentKind;
use tempfile::TempDir;

#[test]
fn conda_environment_detected() {
    let dir = TempDir::new().unwrap();
    let root = common::make_conda(dir.path(), "test_conda", "3.9.7");
    assert_eq!(detect(&root), Some(EnvironmentKind::Conda));
}

#[test]
fn venv_detected() {
    let dir = TempDir::new().unwrap();
    let root = common::make_venv(dir.path(), "test_venv", "3.9.7");
    assert_eq!(detect(&root), Some(EnvironmentKind::Venv));
}

#[test]
fn virtualenv_detected() {
    let dir = TempDir::new().unwrap();
    let root = common::make_virtualenv(dir.path(), "legacy_env", "3.8.10");
    assert_eq!(detect(&root), Some(EnvironmentKind::Virtualenv));
}

#[test]
fn conda_beats_pyvenv_cfg() {
    // A nested conda env created via venv tooling carries both markers;
    // conda-meta is the outer, more specific structure and wins.
    let dir = TempDir::new().unwrap();
    let root = common::make_conda(dir.path(), "hybrid", "3.9.7");
    fs::write(root.join("pyvenv.cfg"), "version = 3.9.7\n").unwrap();
    assert_eq!(detect(&root), Some(EnvironmentKind::Conda));
}

#[test]
fn conda_meta_without_history_is_not_conda() {
    let dir = TempDir::new().unwrap();
    let root = common::make_virtualenv(dir.path(), "half_conda", "3.9.7");
    fs::create_dir_all(root.join("conda-meta")).unwrap();
    assert_eq!(detect(&root), Some(EnvironmentKind::Virtualenv));
}

#[test]
fn plain_directory_is_not_an_environment() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("src");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("main.py"), "print('hello')\n").unwrap();
    assert_eq!(detect(&root), None);
}

#[test]
fn missing_path_is_not_an_environment() {
    let dir = TempDir::new().unwrap();
    assert_eq!(detect(&dir.path().join("nope")), None);
}

#[test]
fn file_path_is_not_an_environment() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("pyvenv.cfg");
    fs::write(&file, "version = 3.9.7\n").unwrap();
    assert_eq!(detect(&file), None);
}

#[test]
fn interpreter_lookup() {
    let dir = TempDir::new().unwrap();
    let root = common::make_venv(dir.path(), "with_python", "3.11.4");
    assert!(find_interpreter(&root).is_some());

    let empty = dir.path().join("empty");
    fs::create_dir_all(empty.join(common::SCRIPTS)).unwrap();
    assert!(find_interpreter(&empty).is_none());
}
