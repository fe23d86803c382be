// Copyright 2021 - 2026 Martin Pool

//! Exit codes from zimbool.
//!
//! These are assigned so that different cases that CI or other automation
//! might want to distinguish are distinct.

/// Everything worked: the service was updated, or the dry run or HCL was printed.
pub const SUCCESS: i32 = 0;

/// The wrong arguments, etc.
///
/// (1 is also the value returned by Clap.)
pub const USAGE: i32 = 1;

/// One or more preflight checks failed, so nothing was attempted.
pub const PREFLIGHT_FAILED: i32 = 2;

/// The env file is missing or could not be parsed.
pub const ENV_FILE: i32 = 3;

/// No `--project` was given and gcloud has no active project.
pub const PROJECT_UNRESOLVED: i32 = 4;

/// gcloud ran but exited non-zero.
pub const GCLOUD_FAILED: i32 = 5;

/// An internal software error, from sysexit.
pub const SOFTWARE: i32 = 70;
