// Copyright 2026 Martin Pool

//! Check that an update can be attempted: gcloud is installed, and both the
//! env file and the service account key exist.
//!
//! Every check runs even if an earlier one failed, so that all the problems
//! are reported together.

use camino::Utf8Path;
use tracing::debug;

use crate::console::print_check;
use crate::error::Error;
use crate::process::ProcessRunner;
use crate::Result;

/// The outcome of one check.
#[derive(Debug)]
pub struct Check {
    /// What was found, for the success line.
    pub description: String,
    pub failure: Option<Error>,
}

impl Check {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Results of all preflight checks, in the order they ran.
#[derive(Debug)]
pub struct PreflightReport {
    pub checks: Vec<Check>,
}

impl PreflightReport {
    pub fn run(
        runner: &dyn ProcessRunner,
        tool: &str,
        env_file: &Utf8Path,
        service_account: &Utf8Path,
    ) -> PreflightReport {
        let tool_check = Check {
            description: format!("{tool} CLI is installed"),
            failure: runner.resolve(tool).err().map(|_| Error::ToolNotFound {
                tool: tool.to_owned(),
            }),
        };
        PreflightReport {
            checks: vec![
                tool_check,
                file_check("env file", env_file),
                file_check("service account file", service_account),
            ],
        }
    }

    pub fn passed(&self) -> bool {
        self.checks.iter().all(Check::passed)
    }

    /// Ok if every check passed, otherwise an error holding all the failures.
    pub fn into_result(self) -> Result<()> {
        let failures: Vec<Error> = self
            .checks
            .into_iter()
            .filter_map(|check| check.failure)
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::PreflightFailed { failures }.into())
        }
    }
}

fn file_check(what: &'static str, path: &Utf8Path) -> Check {
    let failure = if path.exists() {
        None
    } else {
        Some(Error::FileNotFound {
            what,
            path: path.to_owned(),
        })
    };
    Check {
        description: format!("{what} found: {path}"),
        failure,
    }
}

/// Run all the checks, print one line for each, and fail if any failed.
pub fn preflight_check(
    runner: &dyn ProcessRunner,
    tool: &str,
    env_file: &Utf8Path,
    service_account: &Utf8Path,
) -> Result<()> {
    let report = PreflightReport::run(runner, tool, env_file, service_account);
    for check in &report.checks {
        print_check(check);
    }
    debug!(passed = report.passed(), "preflight checks done");
    report.into_result()
}
