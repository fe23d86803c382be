// Copyright 2026 Martin Pool

//! Read `KEY=VALUE` pairs from a `.env` file.
//!
//! The grammar (comments, quoting, `export`, `${VAR}` substitution) is
//! whatever `dotenvy` accepts. Nothing is written into this process's
//! environment.

use std::collections::HashMap;

use camino::Utf8Path;
use tracing::debug;

use crate::error::Error;
use crate::Result;

/// Environment variables by name. If a name repeats in the file, the last value wins.
pub type EnvVars = HashMap<String, String>;

pub fn load_env_file(path: &Utf8Path) -> Result<EnvVars> {
    let parse_error = |source: dotenvy::Error| {
        if source.not_found() {
            Error::FileNotFound {
                what: "env file",
                path: path.to_owned(),
            }
        } else {
            Error::EnvFileParse {
                path: path.to_owned(),
                source,
            }
        }
    };
    let mut env_vars = EnvVars::new();
    for item in dotenvy::from_path_iter(path).map_err(parse_error)? {
        let (key, value) = item.map_err(parse_error)?;
        env_vars.insert(key, value);
    }
    debug!(%path, count = env_vars.len(), "loaded env file");
    Ok(env_vars)
}
