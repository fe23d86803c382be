// Copyright 2026 Martin Pool

//! Failures that end a run, each with a distinct exit code.
//!
//! Functions still return [anyhow::Result]; these are attached at the point
//! of failure so that `main` can find them in the chain and pick the code.

use camino::Utf8PathBuf;
use itertools::Itertools;
use thiserror::Error;

use crate::exit_code;
use crate::process::ProcessStatus;

#[derive(Debug, Error)]
pub enum Error {
    /// The external tool could not be found on the search path.
    #[error("{tool} CLI not found in PATH")]
    ToolNotFound { tool: String },

    #[error("{what} not found: {path}")]
    FileNotFound {
        what: &'static str,
        path: Utf8PathBuf,
    },

    #[error("failed to parse env file {path}: {source}")]
    EnvFileParse {
        path: Utf8PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("project not provided and unable to retrieve active project from gcloud: {reason}")]
    ActiveProjectUnresolvable { reason: String },

    /// The tool ran and exited unsuccessfully; `output` is everything it printed.
    #[error("{argv} failed with {status}, output:\n{output}")]
    SubprocessFailure {
        /// The command line, quoted for a shell.
        argv: String,
        status: ProcessStatus,
        output: String,
    },

    /// Every failed preflight check, in the order they were run.
    #[error("preflight check failed: {}", join_failures(.failures))]
    PreflightFailed { failures: Vec<Error> },

    #[error("{flag} is required unless --to-hcl is given")]
    MissingArgument { flag: &'static str },

    #[error("read config {path}")]
    ConfigRead {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse toml from {path}")]
    ConfigParse {
        path: Utf8PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ToolNotFound { .. } | Error::PreflightFailed { .. } => {
                exit_code::PREFLIGHT_FAILED
            }
            // Only reached outside preflight when the loader can't find the env file.
            Error::FileNotFound { .. } | Error::EnvFileParse { .. } => exit_code::ENV_FILE,
            Error::ActiveProjectUnresolvable { .. } => exit_code::PROJECT_UNRESOLVED,
            Error::SubprocessFailure { .. } => exit_code::GCLOUD_FAILED,
            Error::MissingArgument { .. }
            | Error::ConfigRead { .. }
            | Error::ConfigParse { .. } => exit_code::USAGE,
        }
    }
}

fn join_failures(failures: &[Error]) -> String {
    failures.iter().map(ToString::to_string).join("; ")
}

/// Find the exit code for an error, looking through any added context.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<Error>())
        .map_or(exit_code::SOFTWARE, Error::exit_code)
}
