//! Runtime configuration, read from an optional TOML file.
//!
//! Every key has a default, so an empty file (or no file) is a valid
//! configuration.

use crate::data::OverlapPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("refresh_interval_secs must be at least 1")]
    ZeroInterval,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Location of the JSON data document.
    pub data_path: PathBuf,
    /// Seconds between automatic refreshes of the board.
    pub refresh_interval_secs: u64,
    pub overlap_policy: OverlapPolicy,
    /// `trace`, `debug`, `info`, `warn` or `error`.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from("data.json"),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            overlap_policy: OverlapPolicy::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_toml_str(&contents)
    }

    /// # Examples
    /// ```
    /// use roster_board::config::Config;
    /// use roster_board::data::OverlapPolicy;
    ///
    /// let config = Config::from_toml_str(r#"overlap_policy = "reject""#).unwrap();
    ///
    /// assert_eq!(config.overlap_policy, OverlapPolicy::Reject);
    /// assert_eq!(config.refresh_interval_secs, 60);
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_secs == 0 {
            Err(ConfigError::ZeroInterval)
        } else {
            Ok(())
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// `log_level` as a filter, falling back to `Info` for unknown names.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level
            .trim()
            .parse()
            .unwrap_or(log::LevelFilter::Info)
    }
}
