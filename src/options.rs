// Copyright 2021-2026 Martin Pool

//! Global in-process options, merged from the command line, the config
//! file, and built-in defaults, in that order of precedence.

use camino::{Utf8Path, Utf8PathBuf};

use crate::config::Config;
use crate::error::Error;
use crate::gcloud::DEFAULT_GCLOUD;
use crate::Args;
use crate::Result;

pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_REGION: &str = "us-central1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub env_file: Utf8PathBuf,

    /// If None, ask gcloud for the active project.
    pub project: Option<String>,

    pub region: String,

    service: Option<String>,

    service_account: Option<Utf8PathBuf>,

    /// Name or path of the gcloud binary.
    pub gcloud: String,

    /// Print the command rather than running it.
    pub dry_run: bool,

    /// Print the variables as HCL and do nothing else.
    pub to_hcl: bool,
}

impl Options {
    pub fn new(args: &Args, config: &Config) -> Options {
        Options {
            env_file: args
                .env_file
                .clone()
                .or_else(|| config.env_file.clone())
                .unwrap_or_else(|| DEFAULT_ENV_FILE.into()),
            project: non_empty(args.project.as_ref().or(config.project.as_ref())),
            region: args
                .region
                .clone()
                .or_else(|| config.region.clone())
                .unwrap_or_else(|| DEFAULT_REGION.to_owned()),
            service: non_empty(args.service.as_ref().or(config.service.as_ref())),
            service_account: args
                .service_account
                .clone()
                .or_else(|| config.service_account.clone())
                .filter(|path| !path.as_str().is_empty()),
            gcloud: args
                .gcloud
                .clone()
                .or_else(|| config.gcloud.clone())
                .unwrap_or_else(|| DEFAULT_GCLOUD.to_owned()),
            dry_run: args.dry_run,
            to_hcl: args.to_hcl,
        }
    }

    /// The Cloud Run service, which is required for an update.
    pub fn service(&self) -> Result<&str> {
        self.service
            .as_deref()
            .ok_or_else(|| Error::MissingArgument { flag: "--service" }.into())
    }

    /// The service account key, which is required for an update.
    pub fn service_account(&self) -> Result<&Utf8Path> {
        self.service_account.as_deref().ok_or_else(|| {
            Error::MissingArgument {
                flag: "--service-account",
            }
            .into()
        })
    }
}

fn non_empty(s: Option<&String>) -> Option<String> {
    s.filter(|s| !s.is_empty()).cloned()
}
