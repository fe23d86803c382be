// Copyright 2022-2026 Martin Pool.

//! `.zimbool.toml` configuration file.
//!
//! The config file is read after parsing command line arguments, and
//! is then merged in to the [Options](crate::options::Options), with
//! command line arguments taking precedence.

use std::default::Default;
use std::fs::read_to_string;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::error::Error;
use crate::Result;

/// Name of the config file looked for in the current directory.
pub const CONFIG_FILE_NAME: &str = ".zimbool.toml";

/// Configuration read from a config file.
///
/// This is similar to [Options](crate::options::Options), and eventually
/// merged into it, but separate because it can be deserialized.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Read variables from this file rather than `.env`.
    pub env_file: Option<Utf8PathBuf>,
    /// GCP project, instead of asking gcloud for its active project.
    pub project: Option<String>,
    pub region: Option<String>,
    /// Cloud Run service to update.
    pub service: Option<String>,
    /// Path to the service account JSON key.
    pub service_account: Option<Utf8PathBuf>,
    /// Name or path of the gcloud binary.
    pub gcloud: Option<String>,
}

impl Config {
    pub fn read_file(path: &Utf8Path) -> Result<Config> {
        let toml = read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_owned(),
            source,
        })?;
        toml::de::from_str(&toml).map_err(|source| {
            Error::ConfigParse {
                path: path.to_owned(),
                source,
            }
            .into()
        })
    }

    /// Read `.zimbool.toml` from a directory, and return a default (empty)
    /// Config if the file does not exist.
    pub fn read_dir_config(dir: &Utf8Path) -> Result<Config> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            Config::read_file(&path)
        } else {
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod test {
    use std::fs::write;

    use indoc::indoc;
    use tempfile::TempDir;

    use super::*;

    fn temp_dir() -> (TempDir, Utf8PathBuf) {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(tmp.path().to_owned()).unwrap();
        (tmp, dir)
    }

    #[test]
    fn missing_file_gives_default() {
        let (_tmp, dir) = temp_dir();
        assert_eq!(Config::read_dir_config(&dir).unwrap(), Config::default());
    }

    #[test]
    fn reads_all_fields() {
        let (_tmp, dir) = temp_dir();
        write(
            dir.join(CONFIG_FILE_NAME),
            indoc! { r#"
                env_file = "prod.env"
                project = "acme-prod"
                region = "europe-west1"
                service = "api"
                service_account = "keys/deployer.json"
                gcloud = "/opt/google-cloud-sdk/bin/gcloud"
            "#},
        )
        .unwrap();
        let config = Config::read_dir_config(&dir).unwrap();
        assert_eq!(config.env_file.as_deref(), Some(Utf8Path::new("prod.env")));
        assert_eq!(config.project.as_deref(), Some("acme-prod"));
        assert_eq!(config.region.as_deref(), Some("europe-west1"));
        assert_eq!(config.service.as_deref(), Some("api"));
        assert_eq!(
            config.service_account.as_deref(),
            Some(Utf8Path::new("keys/deployer.json"))
        );
        assert_eq!(
            config.gcloud.as_deref(),
            Some("/opt/google-cloud-sdk/bin/gcloud")
        );
    }

    #[test]
    fn unknown_field_rejected() {
        let (_tmp, dir) = temp_dir();
        write(dir.join(CONFIG_FILE_NAME), "wobble = false\n").unwrap();
        let err = Config::read_dir_config(&dir).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::ConfigParse { .. })
        ));
        assert!(format!("{err:#}").contains("unknown field `wobble`"));
    }
}
