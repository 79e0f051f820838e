//! Configuration management for bloglist.
//!
//! Loads configuration from ${BLOGLIST_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default config template with comments, embedded at compile time.
const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("default_config.toml");

/// Environment variable overriding `api_url`.
pub const API_URL_ENV: &str = "BLOGLIST_API_URL";

pub mod paths {
    //! Path resolution for bloglist configuration and data.
    //!
    //! `BLOGLIST_HOME` resolution order:
    //! 1. `BLOGLIST_HOME` environment variable (if set)
    //! 2. ~/.config/bloglist (default)
    //! 3. ./.bloglist when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the bloglist home directory.
    pub fn bloglist_home() -> PathBuf {
        if let Ok(home) = std::env::var("BLOGLIST_HOME")
            && !home.trim().is_empty()
        {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".bloglist"),
            |h| h.join(".config").join("bloglist"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        bloglist_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        bloglist_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Origin of the API server
    pub api_url: String,

    /// Path of the blogs resource
    pub blogs_path: String,

    /// Path of the login endpoint
    pub login_path: String,

    /// Seconds before a notification is cleared
    pub notification_timeout_secs: u64,
}

impl Config {
    const DEFAULT_API_URL: &str = "http://localhost:3003";
    const DEFAULT_BLOGS_PATH: &str = "/api/blogs";
    const DEFAULT_LOGIN_PATH: &str = "/api/login";
    const DEFAULT_NOTIFICATION_TIMEOUT_SECS: u64 = 10;

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("Invalid config in {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.notification_timeout_secs == 0 {
            anyhow::bail!("notification_timeout_secs must be at least 1");
        }
        Ok(())
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, DEFAULT_CONFIG_TEMPLATE)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }

    /// Returns the API origin with precedence: env > config > default.
    ///
    /// # Errors
    /// Returns an error if the chosen URL is not a valid URL.
    pub fn effective_api_url(&self) -> Result<String> {
        let env_value = std::env::var(API_URL_ENV).ok();
        self.effective_api_url_with(env_value.as_deref())
    }

    fn effective_api_url_with(&self, env_value: Option<&str>) -> Result<String> {
        let chosen = env_value
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| Some(self.api_url.trim()).filter(|s| !s.is_empty()))
            .unwrap_or(Self::DEFAULT_API_URL);

        url::Url::parse(chosen).with_context(|| format!("Invalid API URL: {chosen}"))?;
        Ok(chosen.trim_end_matches('/').to_string())
    }

    /// Full URL of the blogs resource.
    ///
    /// # Errors
    /// Returns an error if the API URL is invalid.
    pub fn blogs_url(&self) -> Result<String> {
        Ok(join_path(&self.effective_api_url()?, &self.blogs_path))
    }

    /// Full URL of the login endpoint.
    ///
    /// # Errors
    /// Returns an error if the API URL is invalid.
    pub fn login_url(&self) -> Result<String> {
        Ok(join_path(&self.effective_api_url()?, &self.login_path))
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }
}

fn join_path(origin: &str, path: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        return origin.to_string();
    }
    format!("{origin}/{}", path.trim_start_matches('/'))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Self::DEFAULT_API_URL.to_string(),
            blogs_path: Self::DEFAULT_BLOGS_PATH.to_string(),
            login_path: Self::DEFAULT_LOGIN_PATH.to_string(),
            notification_timeout_secs: Self::DEFAULT_NOTIFICATION_TIMEOUT_SECS,
        }
    }
}
