// Copyright 2021-2026 Martin Pool

//! Print messages on the terminal, and route trace output to stderr.

use console::style;
use tracing::Level;
use tracing_subscriber::prelude::*;

use crate::preflight::Check;
use crate::Result;

/// Install a global tracing subscriber that writes to stderr at `level` and above.
pub fn setup_global_trace(console_trace_level: Level) -> Result<()> {
    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(console_trace_level);
    let console_layer = tracing_subscriber::fmt::layer()
        .with_ansi(::console::colors_enabled_stderr())
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(level_filter);
    tracing_subscriber::registry().with(console_layer).init();
    Ok(())
}

/// Print one preflight check result, like `✅ gcloud CLI is installed`.
pub fn print_check(check: &Check) {
    println!("{}", format_check(check));
}

fn format_check(check: &Check) -> String {
    match &check.failure {
        None => format!("{} {}", style("✅").green(), check.description),
        Some(failure) => format!("{} {}", style("❌").red(), style(failure).red()),
    }
}

/// Print a message that stands out from the command output around it.
pub fn print_heading(message: &str) {
    println!("{}", style(message).bold());
}
