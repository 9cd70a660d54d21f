//! Shared fixtures: realistic environment directory layouts.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

#[cfg(not(windows))]
pub const SCRIPTS: &str = "bin";
#[cfg(windows)]
pub const SCRIPTS: &str = "Scripts";

#[cfg(not(windows))]
pub const PYTHON: &str = "python";
#[cfg(windows)]
pub const PYTHON: &str = "python.exe";

/// Create a venv-style environment: pyvenv.cfg plus an interpreter stub.
///
/// The version comes from pyvenv.cfg, so the stub never needs to run.
pub fn make_venv(parent: &Path, name: &str, version: &str) -> PathBuf {
    let root = parent.join(name);
    let scripts = root.join(SCRIPTS);
    fs::create_dir_all(&scripts).unwrap();
    fs::write(
        root.join("pyvenv.cfg"),
        format!(
            "home = /usr/bin\ninclude-system-site-packages = false\nversion = {}\n",
            version
        ),
    )
    .unwrap();
    fs::write(scripts.join(PYTHON), "#!/usr/bin/env python3\n").unwrap();
    fs::write(scripts.join("activate"), "# Activation script\n").unwrap();
    root
}

/// Create a conda environment: conda-meta/history plus an executable
/// interpreter stub reporting `version`
pub fn make_conda(parent: &Path, name: &str, version: &str) -> PathBuf {
    let root = parent.join(name);
    let meta = root.join("conda-meta");
    fs::create_dir_all(&meta).unwrap();
    fs::write(
        meta.join("history"),
        format!(
            "# cmd: conda create --name {} python={}\n# date: 2023-01-01 12:00:00 UTC\n",
            name, version
        ),
    )
    .unwrap();
    write_interpreter_stub(&root, version);
    root
}

/// Create a legacy virtualenv: interpreter but no pyvenv.cfg
pub fn make_virtualenv(parent: &Path, name: &str, version: &str) -> PathBuf {
    let root = parent.join(name);
    write_interpreter_stub(&root, version);
    root
}

/// Drop an executable interpreter stub that prints a version banner
pub fn write_interpreter_stub(root: &Path, version: &str) {
    let scripts = root.join(SCRIPTS);
    fs::create_dir_all(&scripts).unwrap();
    let exe = scripts.join(PYTHON);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::write(&exe, format!("#!/bin/sh\necho \"Python {}\"\n", version)).unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
    }
    #[cfg(windows)]
    {
        let _ = version;
        fs::write(&exe, "").unwrap();
    }
}
