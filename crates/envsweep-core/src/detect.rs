//! Environment detection by filesystem markers.
//!
//! Marker precedence, first match wins: conda-meta/history, then pyvenv.cfg,
//! then a bare interpreter under the scripts directory. A directory carrying
//! both conda-meta and pyvenv.cfg is conda: conda-meta marks the outer, more
//! specific structure.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::environment::EnvironmentKind;
use crate::error::SweepResult;

/// Name of the scripts directory inside an environment on this platform
#[cfg(windows)]
pub const SCRIPTS_DIR: &str = "Scripts";
#[cfg(not(windows))]
pub const SCRIPTS_DIR: &str = "bin";

#[cfg(windows)]
const INTERPRETER_NAMES: &[&str] = &["python.exe"];
#[cfg(not(windows))]
const INTERPRETER_NAMES: &[&str] = &["python", "python3"];

/// Find the interpreter executable conventionally placed inside an
/// environment, if present
pub fn find_interpreter(root: &Path) -> Option<PathBuf> {
    let scripts = root.join(SCRIPTS_DIR);
    INTERPRETER_NAMES
        .iter()
        .map(|name| scripts.join(name))
        .find(|candidate| candidate.is_file())
}

pub(crate) fn has_conda_history(root: &Path) -> bool {
    root.join("conda-meta").join("history").is_file()
}

pub(crate) fn has_pyvenv_cfg(root: &Path) -> bool {
    root.join("pyvenv.cfg").is_file()
}

/// Decide whether `path` is an environment root, and of which kind
pub fn detect(path: &Path) -> Option<EnvironmentKind> {
    if !path.is_dir() {
        return None;
    }
    if has_conda_history(path) {
        return Some(EnvironmentKind::Conda);
    }
    if has_pyvenv_cfg(path) {
        return Some(EnvironmentKind::Venv);
    }
    if find_interpreter(path).is_some() {
        return Some(EnvironmentKind::Virtualenv);
    }
    None
}

/// Glob patterns where system Python installations typically live
#[cfg(windows)]
fn system_glob_patterns() -> Vec<&'static str> {
    vec![
        r"C:\Python*\python.exe",
        r"C:\Program Files\Python*\python.exe",
        r"C:\Program Files (x86)\Python*\python.exe",
    ]
}

#[cfg(not(windows))]
fn system_glob_patterns() -> Vec<&'static str> {
    vec![
        "/usr/bin/python*",
        "/usr/local/bin/python*",
        "/opt/python*/bin/python*",
    ]
}

/// Discover system Python interpreters.
///
/// Returns canonical interpreter paths, deduplicated so that `python3` and
/// the `python3.x` it links to count once. Only consulted when
/// `show_system_environments` is enabled.
pub fn find_system_interpreters() -> SweepResult<Vec<PathBuf>> {
    // python3.11 yes, python3.11-config no
    let name_re = match Regex::new(r"^python(?:\d+(?:\.\d+)?)?(?:\.exe)?$") {
        Ok(re) => re,
        Err(_) => return Ok(Vec::new()),
    };

    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut interpreters = Vec::new();

    for pattern in system_glob_patterns() {
        for entry in glob::glob(pattern)? {
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    debug!("skipping unreadable glob entry: {}", err);
                    continue;
                }
            };

            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            if !name_re.is_match(name) {
                continue;
            }

            let canonical = match std::fs::canonicalize(&path) {
                Ok(canonical) => canonical,
                Err(err) => {
                    debug!("cannot resolve {}: {}", path.display(), err);
                    continue;
                }
            };
            if !canonical.is_file() {
                continue;
            }
            if seen.insert(canonical.clone()) {
                interpreters.push(canonical);
            }
        }
    }

    interpreters.sort();
    Ok(interpreters)
}
