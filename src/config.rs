//! Runtime configuration for the source clients.
//!
//! Defaults work out of the box; an optional TOML file and `MUSICDL_*`
//! environment variables override them. The bridge intentionally has no
//! download-related settings: the source layer only resolves URLs, so
//! there is no disk write to switch off.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use tracing::warn;

use crate::error::{BridgeError, Result};

/// Desktop-browser User-Agent; the platforms serve different (or no)
/// payloads to unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,

    /// User-Agent header sent to every platform.
    pub user_agent: String,

    /// Optional HTTP(S) proxy URL.
    pub proxy: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the TOML file (if present),
    /// then environment overrides.
    pub fn load() -> Result<Self> {
        // Pick up a .env file when running under the host application
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Some(path) = Self::config_file_path() {
            if path.exists() {
                let content = fs::read_to_string(&path)
                    .map_err(|e| BridgeError::Config(format!("{}: {}", path.display(), e)))?;
                config = toml::from_str(&content)?;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn config_file_path() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("net", "musicdl", "musicdl-bridge");
        if project_dirs.is_none() {
            warn!("ProjectDirs unavailable; skipping config file");
        }
        project_dirs.map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("MUSICDL_TIMEOUT_SECONDS") {
            self.timeout_seconds = value.parse::<u64>().map_err(|_| {
                BridgeError::Validation(format!(
                    "Invalid number in MUSICDL_TIMEOUT_SECONDS: '{}'",
                    value
                ))
            })?;
        }

        if let Some(value) = env_string("MUSICDL_USER_AGENT") {
            self.user_agent = value;
        }

        if let Some(value) = env_string("MUSICDL_PROXY") {
            self.proxy = Some(value);
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(BridgeError::Validation(
                "timeout_seconds must be greater than zero".to_string(),
            ));
        }

        if let Some(proxy) = &self.proxy {
            if !proxy.starts_with("http://") && !proxy.starts_with("https://") {
                return Err(BridgeError::Validation(format!(
                    "Proxy URL must be http(s): '{}'",
                    proxy
                )));
            }
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Build the shared HTTP client all source clients use.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout())
            .user_agent(self.user_agent.clone());

        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        Ok(builder.build()?)
    }
}

fn env_string(var_name: &str) -> Option<String> {
    match env::var(var_name) {
        Ok(value) => {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}
