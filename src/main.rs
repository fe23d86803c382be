// Copyright 2021-2026 Martin Pool

//! `zimbool`: Push the variables in a `.env` file to a Cloud Run service, or
//! render them as Terraform locals.

mod config;
mod console;
mod env_file;
mod error;
mod exit_code;
mod gcloud;
mod hcl;
mod options;
mod preflight;
mod process;

use std::io;
use std::process::exit;

use camino::{Utf8Path, Utf8PathBuf};
use clap::CommandFactory;
use clap::Parser;
use clap_complete::{generate, Shell};
use tracing::debug;

// Imports of public names from this crate.
use crate::config::Config;
use crate::console::print_heading;
use crate::env_file::load_env_file;
use crate::gcloud::{Gcloud, UpdateCommand};
use crate::hcl::env_vars_to_hcl;
use crate::options::Options;
use crate::preflight::preflight_check;
use crate::process::{ProcessRunner, SubprocessRunner};

pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

/// Push the variables in a .env file to a Cloud Run service, or render them as Terraform locals.
///
/// Without `--to-hcl`, this runs `gcloud run services update --update-env-vars`
/// for the given service, after checking that gcloud, the env file, and the
/// service account key are all present.
#[derive(Parser, PartialEq, Debug)]
#[command(author, about)]
struct Args {
    /// read variables from this file [default: .env].
    #[arg(long)]
    env_file: Option<Utf8PathBuf>,

    /// GCP project ID; if omitted, the active project is read from gcloud.
    #[arg(long)]
    project: Option<String>,

    /// GCP region of the service [default: us-central1].
    #[arg(long)]
    region: Option<String>,

    /// Cloud Run service name (required unless --to-hcl).
    #[arg(long)]
    service: Option<String>,

    /// path to the service account JSON key file (required unless --to-hcl).
    #[arg(long)]
    service_account: Option<Utf8PathBuf>,

    /// print the gcloud command that would be run, without running it.
    #[arg(long)]
    dry_run: bool,

    /// print the variables as a Terraform locals block, and do nothing else.
    #[arg(long)]
    to_hcl: bool,

    /// name or path of the gcloud binary [default: gcloud].
    #[arg(long, env = "ZIMBOOL_GCLOUD")]
    gcloud: Option<String>,

    /// read this config file rather than ./.zimbool.toml.
    #[arg(long, conflicts_with = "no_config")]
    config: Option<Utf8PathBuf>,

    /// don't read .zimbool.toml.
    #[arg(long)]
    no_config: bool,

    /// log level for stderr (trace, debug, info, warn, error).
    #[arg(long, short = 'L', default_value = "info", env = "ZIMBOOL_TRACE_LEVEL")]
    level: tracing::Level,

    /// generate autocompletions for the given shell.
    #[arg(long)]
    completions: Option<Shell>,

    /// show version and quit.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    version: bool,
}

fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            exit(if e.use_stderr() {
                exit_code::USAGE
            } else {
                exit_code::SUCCESS
            });
        }
    };
    crate::console::setup_global_trace(args.level)?;

    if args.version {
        println!("{NAME} {VERSION}");
        return Ok(());
    } else if let Some(shell) = args.completions {
        generate(shell, &mut Args::command(), NAME, &mut io::stdout());
        return Ok(());
    }

    if let Err(err) = read_options(&args).and_then(|options| run(&options, &SubprocessRunner)) {
        eprintln!("Error: {err:#}");
        exit(error::exit_code_for(&err));
    }
    Ok(())
}

fn read_options(args: &Args) -> Result<Options> {
    let config = if args.no_config {
        Config::default()
    } else if let Some(path) = &args.config {
        Config::read_file(path)?
    } else {
        Config::read_dir_config(Utf8Path::new("."))?
    };
    debug!(?config);
    let options = Options::new(args, &config);
    debug!(?options);
    Ok(options)
}

/// Load the env file and then either print it as HCL or update the service.
fn run(options: &Options, runner: &dyn ProcessRunner) -> Result<()> {
    let env_vars = load_env_file(&options.env_file)?;

    if options.to_hcl {
        print!("{}", env_vars_to_hcl(&env_vars));
        return Ok(());
    }

    let service = options.service()?;
    let service_account = options.service_account()?;

    print_heading("🛠️ Running preflight checks...");
    preflight_check(runner, &options.gcloud, &options.env_file, service_account)?;
    println!("✅ Preflight checks passed!");

    let gcloud = Gcloud::new(&options.gcloud, runner);
    let project = match &options.project {
        Some(project) => project.clone(),
        None => gcloud.active_project()?,
    };
    let command = UpdateCommand::new(
        gcloud.tool(),
        service,
        &project,
        &options.region,
        &env_vars,
    );

    if options.dry_run {
        gcloud.dry_run(&command, Some(service_account), io::stdout().lock())?;
        println!("Dry run complete. No changes were made.");
    } else {
        let output = gcloud.update_env(&command, Some(service_account))?;
        println!("{} output:\n{output}", gcloud.tool());
        println!("Environment variables updated successfully.");
    }
    Ok(())
}
