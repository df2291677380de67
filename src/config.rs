/// Configuration file for countdown defaults and hooks
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CountdownError, Result};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Default refresh interval in seconds when `--refresh` is not given.
    pub refresh: Option<u64>,
    /// Request sleep prevention even without `--caffeinate`.
    pub caffeinate: bool,
    pub hooks: Hooks,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Hooks {
    pub start: Option<String>,
    pub complete: Option<String>,
}

impl Config {
    /// Loads the config from an explicit path, or from the default location.
    ///
    /// A missing file yields defaults. Problems with the default file are
    /// logged and ignored; problems with an explicit file are errors.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path)?.ok_or_else(|| CountdownError::Config {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            }),
            None => {
                let path = default_config_path();
                match Self::read(&path) {
                    Ok(Some(config)) => Ok(config),
                    Ok(None) => {
                        log::debug!("No config at {}, using defaults", path.display());
                        Ok(Self::default())
                    }
                    Err(e) => {
                        log::warn!("{}; using defaults", e);
                        Ok(Self::default())
                    }
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(|e| CountdownError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = Self::parse(&content).map_err(|e| CountdownError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(Some(config))
    }

    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(home) = env::var_os("HOME") {
        PathBuf::from(home)
            .join(".config")
            .join("countdown")
            .join("config.json")
    } else {
        PathBuf::from("countdown-config.json")
    }
}
