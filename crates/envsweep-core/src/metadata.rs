//! Metadata extraction for confirmed environments.
//!
//! Every sub-step here degrades independently: a failed probe leaves its
//! field at the unknown sentinel and appends a per-record warning. Nothing in
//! this module aborts an environment's record, let alone the scan.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use tracing::debug;
use walkdir::WalkDir;

use crate::detect;
use crate::environment::EnvironmentKind;
use crate::python::PythonVersion;

/// Facts gathered about one environment during the metadata pass
#[derive(Debug, Clone, Default)]
pub struct EnvironmentFacts {
    /// Interpreter resolved inside the environment, if any
    pub interpreter: Option<PathBuf>,
    /// Interpreter version, absent when undetectable
    pub python_version: Option<PythonVersion>,
    /// Recursive size in bytes, symlinks not followed
    pub size_bytes: u64,
    /// Top-level installed package metadata entries
    pub package_count: usize,
    /// Required substructure vanished between detection and extraction
    pub structurally_broken: bool,
    /// The environment could not be examined at all
    pub unavailable: bool,
    /// Filesystem mtime of the environment root
    pub modified: Option<DateTime<Utc>>,
    /// Warnings collected along the way
    pub warnings: Vec<String>,
}

impl EnvironmentFacts {
    /// Facts for an environment that could not be examined at all
    pub fn unavailable(reason: String) -> Self {
        Self {
            unavailable: true,
            warnings: vec![reason],
            ..Self::default()
        }
    }
}

/// Run the metadata pass for a confirmed environment root
pub fn extract(root: &Path, kind: EnvironmentKind) -> EnvironmentFacts {
    if !root.is_dir() {
        return EnvironmentFacts::unavailable(format!(
            "environment directory disappeared: {}",
            root.display()
        ));
    }

    let mut facts = EnvironmentFacts {
        interpreter: detect::find_interpreter(root),
        ..EnvironmentFacts::default()
    };

    // Re-check required substructure: the detector saw conda-meta/history,
    // but it may be gone by the time we get here.
    if kind == EnvironmentKind::Conda && !detect::has_conda_history(root) {
        facts.structurally_broken = true;
        facts.warnings.push("conda-meta/history missing".to_string());
    }

    facts.python_version = match kind {
        EnvironmentKind::Venv => pyvenv_cfg_version(root).or_else(|| {
            facts
                .interpreter
                .as_deref()
                .and_then(probe_interpreter_version)
        }),
        _ => facts
            .interpreter
            .as_deref()
            .and_then(probe_interpreter_version),
    };
    if facts.python_version.is_none() {
        facts
            .warnings
            .push("python version undetectable".to_string());
    }

    facts.size_bytes = dir_size(root, &mut facts.warnings);
    facts.package_count = package_count(root, kind, &mut facts.warnings);
    facts.modified = root_mtime(root);

    facts
}

/// Metadata pass for a system interpreter: version and mtime only.
///
/// Size and package accounting stay at zero; a system prefix is not cleanup
/// inventory.
pub fn extract_system(interpreter: &Path) -> EnvironmentFacts {
    let mut facts = EnvironmentFacts {
        interpreter: Some(interpreter.to_path_buf()),
        ..EnvironmentFacts::default()
    };
    facts.python_version = probe_interpreter_version(interpreter);
    if facts.python_version.is_none() {
        facts
            .warnings
            .push("python version undetectable".to_string());
    }
    facts.modified = root_mtime(interpreter);
    facts
}

/// Read the interpreter version from pyvenv.cfg.
///
/// venv writes `version = 3.11.4`; some tools write `version_info` instead.
fn pyvenv_cfg_version(root: &Path) -> Option<PythonVersion> {
    let contents = fs::read_to_string(root.join("pyvenv.cfg")).ok()?;
    for line in contents.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key == "version" || key == "version_info" {
            return PythonVersion::extract(value);
        }
    }
    None
}

/// Ask an interpreter for its version.
///
/// Modern interpreters print "Python X.Y.Z" on stdout; python2-era builds
/// printed it on stderr.
pub(crate) fn probe_interpreter_version(interpreter: &Path) -> Option<PythonVersion> {
    let output = match Command::new(interpreter).arg("--version").output() {
        Ok(output) => output,
        Err(err) => {
            debug!("cannot run {}: {}", interpreter.display(), err);
            return None;
        }
    };
    if !output.status.success() {
        return None;
    }
    let text = if output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stderr)
    } else {
        String::from_utf8_lossy(&output.stdout)
    };
    PythonVersion::extract(&text)
}

/// Recursive sum of file sizes under `root`, symlinks not followed
fn dir_size(root: &Path, warnings: &mut Vec<String>) -> u64 {
    let mut total = 0u64;
    let mut errors = 0u64;

    for entry in WalkDir::new(root).follow_links(false) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() {
                    match entry.metadata() {
                        Ok(meta) => total += meta.len(),
                        Err(_) => errors += 1,
                    }
                }
            }
            Err(_) => errors += 1,
        }
    }

    if errors > 0 {
        warnings.push(format!(
            "size may be underreported: {} entries unreadable",
            errors
        ));
    }
    total
}

/// Count top-level installed package metadata entries.
///
/// conda records packages as conda-meta/*.json; pip installs leave
/// *.dist-info / *.egg-info entries in site-packages.
fn package_count(root: &Path, kind: EnvironmentKind, warnings: &mut Vec<String>) -> usize {
    let meta_dir = match kind {
        EnvironmentKind::Conda => root.join("conda-meta"),
        _ => match site_packages_dir(root) {
            Some(dir) => dir,
            None => {
                warnings.push("package count unavailable: site-packages not found".to_string());
                return 0;
            }
        },
    };

    let entries = match fs::read_dir(&meta_dir) {
        Ok(entries) => entries,
        Err(err) => {
            warnings.push(format!("package count unavailable: {}", err));
            return 0;
        }
    };

    entries
        .flatten()
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            match kind {
                EnvironmentKind::Conda => name.ends_with(".json"),
                _ => name.ends_with(".dist-info") || name.ends_with(".egg-info"),
            }
        })
        .count()
}

#[cfg(windows)]
fn site_packages_dir(root: &Path) -> Option<PathBuf> {
    let dir = root.join("Lib").join("site-packages");
    dir.is_dir().then_some(dir)
}

#[cfg(not(windows))]
fn site_packages_dir(root: &Path) -> Option<PathBuf> {
    let lib = root.join("lib");
    for entry in fs::read_dir(lib).ok()?.flatten() {
        if entry.file_name().to_string_lossy().starts_with("python") {
            let dir = entry.path().join("site-packages");
            if dir.is_dir() {
                return Some(dir);
            }
        }
    }
    None
}

fn root_mtime(path: &Path) -> Option<DateTime<Utc>> {
    fs::metadata(path)
        .ok()
        .and_then(|meta| meta.modified().ok())
        .map(DateTime::<Utc>::from)
}
