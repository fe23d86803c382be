// Copyright 2021-2026 Martin Pool

//! Run a subprocess to completion and collect what it printed.
//!
//! This module is above the external `subprocess` crate, but has no
//! knowledge of whether it's running gcloud or potentially something else.
//!
//! Callers hold a `&dyn ProcessRunner` so that tests can substitute a fake
//! and never spawn anything.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use anyhow::Context;
use subprocess::{ExitStatus, Popen, PopenConfig, Redirection};
#[allow(unused_imports)]
use tracing::{debug, debug_span, trace, warn};

use crate::Result;

/// Something that can find programs and run them.
pub trait ProcessRunner: fmt::Debug {
    /// Find a program on the search path, or check that an explicit path exists.
    fn resolve(&self, program: &str) -> Result<PathBuf>;

    /// Run `argv` to completion, with `env` added to the inherited environment
    /// of the child only.
    ///
    /// An error means the process could not be run at all; an unsuccessful
    /// exit is reported in the returned [ProcessOutput].
    fn run(&self, argv: &[String], env: &[(String, String)]) -> Result<ProcessOutput>;
}

/// The result of running a single child process.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProcessStatus {
    Success,
    /// Exited unsuccessfully, with the exit code if there was one.
    Failure(Option<u32>),
}

impl ProcessStatus {
    pub fn success(&self) -> bool {
        *self == ProcessStatus::Success
    }
}

impl From<ExitStatus> for ProcessStatus {
    fn from(status: ExitStatus) -> Self {
        match status {
            s if s.success() => ProcessStatus::Success,
            ExitStatus::Exited(code) => ProcessStatus::Failure(Some(code)),
            _ => ProcessStatus::Failure(None),
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessStatus::Success => write!(f, "success"),
            ProcessStatus::Failure(Some(code)) => write!(f, "exit code {code}"),
            ProcessStatus::Failure(None) => write!(f, "abnormal termination"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessOutput {
    pub status: ProcessStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Stdout followed by stderr, as one string.
    pub fn combined(&self) -> String {
        let mut combined = self.stdout.clone();
        if !combined.is_empty() && !combined.ends_with('\n') && !self.stderr.is_empty() {
            combined.push('\n');
        }
        combined.push_str(&self.stderr);
        combined
    }
}

/// Runs real processes through `subprocess`, and finds them with `which`.
#[derive(Debug, Default)]
pub struct SubprocessRunner;

impl ProcessRunner for SubprocessRunner {
    fn resolve(&self, program: &str) -> Result<PathBuf> {
        which::which(program).with_context(|| format!("find {program:?} in PATH"))
    }

    fn run(&self, argv: &[String], env: &[(String, String)]) -> Result<ProcessOutput> {
        let quoted_argv = cheap_shell_quote(argv);
        let _span = debug_span!("run", argv = %quoted_argv).entered();
        debug!("start process");
        let mut os_env = PopenConfig::current_env();
        os_env.extend(
            env.iter()
                .map(|(k, v)| (OsString::from(k), OsString::from(v))),
        );
        let mut child = Popen::create(
            argv,
            PopenConfig {
                stdin: Redirection::None,
                stdout: Redirection::Pipe,
                stderr: Redirection::Pipe,
                env: Some(os_env),
                ..Default::default()
            },
        )
        .with_context(|| format!("failed to spawn {}", argv.join(" ")))?;
        let (stdout, stderr) = child
            .communicate_bytes(None)
            .with_context(|| format!("failed to read output of {quoted_argv}"))?;
        let status = child
            .wait()
            .with_context(|| format!("failed to wait for {quoted_argv}"))?;
        debug!(?status, "process exited");
        Ok(ProcessOutput {
            status: status.into(),
            stdout: lossy_string(stdout),
            stderr: lossy_string(stderr),
        })
    }
}

/// Decode captured output, replacing anything that isn't UTF-8.
fn lossy_string(bytes: Option<Vec<u8>>) -> String {
    String::from_utf8_lossy(&bytes.unwrap_or_default()).into_owned()
}

/// Quote an argv slice in Unix shell style.
///
/// This is not completely guaranteed, but is only for logs.
pub fn cheap_shell_quote<S: AsRef<str>, I: IntoIterator<Item = S>>(argv: I) -> String {
    argv.into_iter()
        .map(|s| {
            s.as_ref()
                .chars()
                .flat_map(|c| match c {
                    ' ' | '\t' | '\n' | '\r' | '\\' | '\'' | '"' | '$' | '`' => vec!['\\', c],
                    _ => vec![c],
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}
