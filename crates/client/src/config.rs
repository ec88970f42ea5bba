//! Client configuration, resolved from the environment.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use jury_observability::LogFormat;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// File name of the persisted access token inside the data directory.
pub const TOKEN_FILE_NAME: &str = "access_token";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("failed to resolve a data directory for the session token; set JURY_TOKEN_PATH")]
    NoDataDir,
}

/// Immutable configuration of one client process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the evaluation backend, without trailing slash.
    pub api_url: String,
    /// Where the session token is persisted between runs.
    pub token_path: PathBuf,
    /// Per-request timeout.
    pub timeout: Duration,
    pub log_format: LogFormat,
}

impl ClientConfig {
    /// Load from the process environment.
    ///
    /// - `JURY_API_URL` (default `http://localhost:8000`)
    /// - `JURY_TOKEN_PATH` (default `<data_dir>/jury/access_token`)
    /// - `JURY_HTTP_TIMEOUT_SECS` (default 30)
    /// - `JURY_LOG_FORMAT` (`text` | `json`, default `text`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("JURY_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = normalize_api_url(&api_url)?;

        let token_path = match lookup("JURY_TOKEN_PATH").filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_token_path()?,
        };

        let timeout = match lookup("JURY_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    var: "JURY_HTTP_TIMEOUT_SECS",
                    reason: e.to_string(),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        var: "JURY_HTTP_TIMEOUT_SECS",
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let log_format = match lookup("JURY_LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>().map_err(|e| ConfigError::Invalid {
                var: "JURY_LOG_FORMAT",
                reason: e.to_string(),
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            api_url,
            token_path,
            timeout,
            log_format,
        })
    }

    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        self.api_url = normalize_api_url(api_url)?;
        Ok(self)
    }

    pub fn with_token_path(mut self, token_path: impl Into<PathBuf>) -> Self {
        self.token_path = token_path.into();
        self
    }
}

fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let url = raw.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            var: "JURY_API_URL",
            reason: format!("'{raw}' is not an http(s) URL"),
        });
    }
    Ok(url.to_string())
}

/// `{data_dir}/jury/access_token`, falling back to `~/.local/share`.
fn default_token_path() -> Result<PathBuf, ConfigError> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or(ConfigError::NoDataDir)?;

    let mut path = base;
    path.push("jury");
    path.push(TOKEN_FILE_NAME);
    Ok(path)
}
