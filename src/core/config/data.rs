use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::config::io::ConfigError;

/// Where the routing server listens when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

pub const BASE_URL_ENV: &str = "OPTIROUTE_BASE_URL";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Root URL of the routing server; `/generate` and `/health` hang off it.
    pub base_url: Option<String>,
    /// Transcript log used when `--log` is not given.
    pub log_file: Option<String>,
}

/// Settings addressable from `optiroute set` / `optiroute unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    BaseUrl,
    LogFile,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 2] = [ConfigKey::BaseUrl, ConfigKey::LogFile];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::BaseUrl => "base-url",
            ConfigKey::LogFile => "log-file",
        }
    }

    pub fn parse(key: &str) -> Result<Self, ConfigError> {
        ConfigKey::ALL
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(key.trim()))
            .ok_or_else(|| ConfigError::UnknownKey {
                key: key.to_string(),
            })
    }
}

impl Config {
    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        match key {
            ConfigKey::BaseUrl => self.base_url.as_deref(),
            ConfigKey::LogFile => self.log_file.as_deref(),
        }
    }

    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: key.as_str().to_string(),
                reason: "value must not be empty".to_string(),
            });
        }

        match key {
            ConfigKey::BaseUrl => {
                if !is_http_url(value) {
                    return Err(ConfigError::InvalidValue {
                        key: key.as_str().to_string(),
                        reason: format!("expected an http:// or https:// URL, got '{value}'"),
                    });
                }
                self.base_url = Some(value.trim_end_matches('/').to_string());
            }
            ConfigKey::LogFile => self.log_file = Some(value.to_string()),
        }
        Ok(())
    }

    pub fn unset(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::BaseUrl => self.base_url = None,
            ConfigKey::LogFile => self.log_file = None,
        }
    }

    /// Picks the server URL: command-line flag, then environment, then the
    /// config file, then [`DEFAULT_BASE_URL`]. Blank values are skipped.
    pub fn resolve_base_url(&self, cli_value: Option<&str>, env_value: Option<&str>) -> String {
        [cli_value, env_value, self.base_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn resolve_log_file(&self, cli_value: Option<String>) -> Option<String> {
        cli_value
            .filter(|path| !path.trim().is_empty())
            .or_else(|| self.log_file.clone())
    }
}

fn is_http_url(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    ["http://", "https://"]
        .iter()
        .any(|scheme| lower.starts_with(scheme) && lower.len() > scheme.len())
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
