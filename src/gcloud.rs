// Copyright 2026 Martin Pool

//! Drive the `gcloud` CLI: update a Cloud Run service's environment, describe
//! that update without running it, and find the active project.

use std::io::Write;

use anyhow::Context;
use camino::Utf8Path;
use itertools::Itertools;
#[allow(unused_imports)]
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::process::ProcessRunner;
use crate::Result;

/// The tool used when nothing else is configured.
pub const DEFAULT_GCLOUD: &str = "gcloud";

/// Set in the child's environment to point gcloud at the service account key.
pub const CREDENTIALS_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Values gcloud prints from `config get-value` when nothing is set.
const UNSET_VALUES: &[&str] = &["unset", "(unset)"];

/// Alternate delimiters for `--update-env-vars`, in order of preference,
/// used when some key or value contains a comma. See `gcloud topic escaping`.
const ALTERNATE_DELIMITERS: &[char] = &['@', '|', '#', ';', '~', ':'];

/// One `gcloud run services update` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCommand {
    pub tool: String,
    pub service: String,
    pub project: String,
    pub region: String,
    /// Sorted by key.
    env_pairs: Vec<(String, String)>,
}

impl UpdateCommand {
    pub fn new<'a, I>(tool: &str, service: &str, project: &str, region: &str, env_vars: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let env_pairs = env_vars
            .into_iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .sorted()
            .collect();
        UpdateCommand {
            tool: tool.to_owned(),
            service: service.to_owned(),
            project: project.to_owned(),
            region: region.to_owned(),
            env_pairs,
        }
    }

    /// The full argv, starting with the tool.
    pub fn argv(&self) -> Vec<String> {
        [
            self.tool.as_str(),
            "run",
            "services",
            "update",
            self.service.as_str(),
            "--project",
            self.project.as_str(),
            "--region",
            self.region.as_str(),
            "--update-env-vars",
            self.env_vars_arg().as_str(),
            "--quiet",
        ]
        .map(str::to_owned)
        .into()
    }

    /// The value for `--update-env-vars`: `K1=V1,K2=V2`.
    fn env_vars_arg(&self) -> String {
        let pairs = self
            .env_pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect_vec();
        if !pairs.iter().any(|p| p.contains(',')) {
            return pairs.join(",");
        }
        match ALTERNATE_DELIMITERS
            .iter()
            .find(|&&delim| !pairs.iter().any(|p| p.contains(delim)))
        {
            Some(delim) => format!("^{delim}^{}", pairs.join(&delim.to_string())),
            None => {
                warn!("no free delimiter for env vars containing commas; gcloud may split values");
                pairs.join(",")
            }
        }
    }
}

/// Runs gcloud through some [ProcessRunner].
#[derive(Debug)]
pub struct Gcloud<'r> {
    tool: String,
    runner: &'r dyn ProcessRunner,
}

impl<'r> Gcloud<'r> {
    pub fn new(tool: &str, runner: &'r dyn ProcessRunner) -> Self {
        Gcloud {
            tool: tool.to_owned(),
            runner,
        }
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Ask gcloud for its configured default project.
    pub fn active_project(&self) -> Result<String> {
        let unresolvable = |reason: String| Error::ActiveProjectUnresolvable { reason };
        if let Err(err) = self.runner.resolve(&self.tool) {
            debug!("{err:#}");
            return Err(unresolvable(format!("{} not found in PATH", self.tool)).into());
        }
        let argv =
            [self.tool.as_str(), "config", "get-value", "project", "--quiet"].map(str::to_owned);
        let output = self
            .runner
            .run(&argv, &[])
            .map_err(|err| unresolvable(format!("{} command failed: {err:#}", self.tool)))?;
        if !output.status.success() {
            return Err(unresolvable(format!(
                "{} command failed with {}: {}",
                self.tool,
                output.status,
                output.stderr.trim()
            ))
            .into());
        }
        let project = output.stdout.trim();
        if project.is_empty() || UNSET_VALUES.contains(&project) {
            return Err(unresolvable("active project not set in gcloud".to_owned()).into());
        }
        debug!(%project, "found active project");
        Ok(project.to_owned())
    }

    /// Run the update, returning everything gcloud printed.
    ///
    /// The credentials path, if any, is set only in gcloud's environment.
    pub fn update_env(
        &self,
        command: &UpdateCommand,
        credentials: Option<&Utf8Path>,
    ) -> Result<String> {
        let env = credentials_env(credentials);
        info!(
            service = %command.service,
            project = %command.project,
            region = %command.region,
            "updating Cloud Run environment"
        );
        let output = self
            .runner
            .run(&command.argv(), &env)
            .with_context(|| format!("run {}", self.tool))?;
        if output.status.success() {
            Ok(output.combined())
        } else {
            Err(Error::SubprocessFailure {
                argv: shell_words::join(command.argv()),
                status: output.status,
                output: output.combined(),
            }
            .into())
        }
    }

    /// Describe the update without running anything.
    ///
    /// The command line is quoted so that pasting it into a shell runs the
    /// same argv.
    pub fn dry_run<W: Write>(
        &self,
        command: &UpdateCommand,
        credentials: Option<&Utf8Path>,
        mut out: W,
    ) -> Result<()> {
        writeln!(
            out,
            "Dry Run - The following {} command would be executed:",
            self.tool
        )?;
        writeln!(out, "{}", shell_words::join(command.argv()))?;
        for (name, value) in credentials_env(credentials) {
            writeln!(out, "with {name}={}", shell_words::quote(&value))?;
        }
        Ok(())
    }
}

fn credentials_env(credentials: Option<&Utf8Path>) -> Vec<(String, String)> {
    credentials
        .map(|path| (CREDENTIALS_VAR.to_owned(), path.to_string()))
        .into_iter()
        .collect()
}
