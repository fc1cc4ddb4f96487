//! Configuration management for the diary client.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults.
//!
//! # Environment Variables
//!
//! - `DIARY_SERVER_URL`: Base URL of the diary server (defaults to http://127.0.0.1:8080)
//! - `DIARY_DIR`: Directory holding the encrypted private key (defaults to ~/.diary)
//! - `DIARY_GEOIP_URL`: Geolocation endpoint; set to an empty string to disable
//! - `DIARY_TIMEOUT_SECS`: HTTP request timeout in seconds (defaults to 30)
//! - `HOME`: Used for expanding the default state directory path

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_GEOIP_URL, DEFAULT_SERVER_URL, DEFAULT_STATE_SUBDIR, DEFAULT_TIMEOUT_SECS,
    ENV_VAR_DIARY_DIR, ENV_VAR_GEOIP_URL, ENV_VAR_HOME, ENV_VAR_SERVER_URL, ENV_VAR_TIMEOUT_SECS,
    REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};

/// Configuration for the diary client.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use diary_client::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     server_url: "https://diary.example.com".to_string(),
///     state_dir: PathBuf::from("/home/me/.diary"),
///     geoip_url: None,
///     timeout_secs: 10,
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct Config {
    /// Base URL of the diary server.
    pub server_url: String,

    /// Directory where the encrypted private key is persisted.
    pub state_dir: PathBuf,

    /// Geolocation endpoint, `None` when the lookup is disabled.
    pub geoip_url: Option<String>,

    /// Per-request HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_url", &self.server_url)
            .field("state_dir", &REDACTED_PLACEHOLDER)
            .field("geoip_url", &self.geoip_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_url: DEFAULT_SERVER_URL.to_string(),
            state_dir: PathBuf::from(""),
            geoip_url: Some(DEFAULT_GEOIP_URL.to_string()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The state directory is expanded with `shellexpand` to handle `~` and
    /// environment variable references.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if path expansion fails, the state directory
    /// is empty, or the timeout is not a positive integer.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use diary_client::Config;
    ///
    /// match Config::load() {
    ///     Ok(config) => println!("Using server {}", config.server_url),
    ///     Err(err) => eprintln!("Failed to load config: {}", err),
    /// }
    /// ```
    pub fn load() -> AppResult<Self> {
        let server_url =
            env::var(ENV_VAR_SERVER_URL).unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());

        let state_dir_str = env::var(ENV_VAR_DIARY_DIR).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_else(|_| "".to_string());
            format!("{}/{}", home, DEFAULT_STATE_SUBDIR)
        });
        let expanded_path = shellexpand::full(&state_dir_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        let state_dir = PathBuf::from(expanded_path.into_owned());

        if state_dir.as_os_str().is_empty() {
            return Err(AppError::Config("State directory path is empty".to_string()));
        }

        let geoip_url = match env::var(ENV_VAR_GEOIP_URL) {
            Ok(url) if url.trim().is_empty() => None,
            Ok(url) => Some(url),
            Err(_) => Some(DEFAULT_GEOIP_URL.to_string()),
        };

        let timeout_secs = match env::var(ENV_VAR_TIMEOUT_SECS) {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_VAR_TIMEOUT_SECS, raw
                ))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            server_url,
            state_dir,
            geoip_url,
            timeout_secs,
        })
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` with one of the following messages:
    /// - "Server URL must start with http:// or https://"
    /// - "State directory path is empty"
    /// - "State directory must be an absolute path"
    /// - "Timeout must be greater than zero"
    ///
    /// # Examples
    ///
    /// ```
    /// use diary_client::Config;
    /// use std::path::PathBuf;
    ///
    /// let invalid = Config {
    ///     server_url: "ftp://diary".to_string(),
    ///     state_dir: PathBuf::from("/absolute/path"),
    ///     geoip_url: None,
    ///     timeout_secs: 30,
    /// };
    /// assert!(invalid.validate().is_err());
    /// ```
    pub fn validate(&self) -> AppResult<()> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(AppError::Config(
                "Server URL must start with http:// or https://".to_string(),
            ));
        }

        if self.state_dir.as_os_str().is_empty() {
            return Err(AppError::Config("State directory path is empty".to_string()));
        }

        if !self.state_dir.is_absolute() {
            return Err(AppError::Config(
                "State directory must be an absolute path".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(AppError::Config(
                "Timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
