// Copyright 2024-2026 Martin Pool

#![allow(dead_code)] // rustc doesn't understand they're used by multiple crates

//! Reusable utilities for zimbool integration tests.

use std::env;
use std::fs::{self, read_to_string, write};
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use tempfile::TempDir;

lazy_static! {
    pub static ref MAIN_BINARY: PathBuf = assert_cmd::cargo::cargo_bin("zimbool");
}

/// Variables that appear in every test env file.
pub const SAMPLE_ENV: &str = "FOO=bar\nBAZ=qux\n";

/// Build a command for the zimbool binary, with no inherited `ZIMBOOL_*`
/// settings, running inside `dir`.
pub fn run_in(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(MAIN_BINARY.as_os_str());
    // Strip any options configured in the environment running these tests,
    // so that they don't cause unexpected behavior in the code under test.
    env::vars()
        .map(|(k, _v)| k)
        .filter(|k| {
            k.starts_with("ZIMBOOL_")
                || k == "GOOGLE_APPLICATION_CREDENTIALS"
                || k == "CLICOLOR_FORCE"
        })
        .for_each(|k| {
            cmd.env_remove(k);
        });
    cmd.current_dir(dir);
    cmd
}

/// A scratch directory holding `.env` and `sa.json`.
pub struct Workdir {
    pub tmp: TempDir,
}

impl Workdir {
    pub fn new() -> Workdir {
        let tmp = TempDir::with_prefix("zimbool-test-").unwrap();
        write(tmp.path().join(".env"), SAMPLE_ENV).unwrap();
        write(tmp.path().join("sa.json"), "{}\n").unwrap();
        Workdir { tmp }
    }

    pub fn path(&self) -> &Path {
        self.tmp.path()
    }

    pub fn run(&self) -> assert_cmd::Command {
        run_in(self.path())
    }

    pub fn write(&self, name: &str, content: &str) {
        write(self.path().join(name), content).unwrap();
    }

    pub fn remove(&self, name: &str) {
        fs::remove_file(self.path().join(name)).unwrap();
    }

    /// Path of the log the stub gcloud appends each invocation to.
    pub fn stub_log(&self) -> PathBuf {
        self.path().join("gcloud.log")
    }

    /// Lines logged by the stub gcloud, or empty if it never ran.
    pub fn stub_calls(&self) -> Vec<String> {
        read_to_string(self.stub_log())
            .map(|log| log.lines().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    /// Install a fake gcloud in `bin/` and return its path.
    ///
    /// It logs its arguments, answers `config get-value project` with
    /// `$STUB_PROJECT` (default `stub-project`), and for `run services update`
    /// prints the credentials it was given, failing if `$STUB_FAIL` is set.
    #[cfg(unix)]
    pub fn install_stub_gcloud(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let bin_dir = self.path().join("bin");
        fs::create_dir_all(&bin_dir).unwrap();
        let path = bin_dir.join("gcloud");
        let script = format!(
            r#"#!/bin/sh
echo "$*" >> "{log}"
if [ "$1" = "config" ]; then
  echo "${{STUB_PROJECT-stub-project}}"
  exit 0
fi
if [ "$1" = "run" ]; then
  echo "credentials=${{GOOGLE_APPLICATION_CREDENTIALS:-none}}"
  if [ -n "${{STUB_FAIL:-}}" ]; then
    echo "ERROR: (gcloud.run.services.update) PERMISSION_DENIED" >&2
    exit 1
  fi
  echo "Service [$4] has been updated."
  exit 0
fi
exit 2
"#,
            log = self.stub_log().display()
        );
        write(&path, script).unwrap();
        let mut permissions = fs::metadata(&path).unwrap().permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(&path, permissions).unwrap();
        path
    }
}
