//! Read-only settings loaded once at startup from `config.toml`.
//!
//! The file lives in the platform config directory under `AstronomicalWatch/`.
//! Every key is optional; missing keys take the defaults below. The program
//! never writes the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.toml";
const APP_NAME: &str = "AstronomicalWatch";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_EXPLANATION_PAGE_URL: &str = "http://localhost:8000/explanation.html";
pub const DEFAULT_BANNER_ELEMENT_ID: &str = "astro-banner";
pub const DEFAULT_EXPLANATION_ELEMENT_ID: &str = "explanation-content";

const TIME_PATH: &str = "/api/time";
const EXPLANATION_PATH: &str = "/api/explanation";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub poll_interval_ms: u64,
    /// Page opened in a new browser context when the banner is clicked.
    pub explanation_page_url: String,
    pub banner_element_id: String,
    pub explanation_element_id: String,
    /// Overrides the detected system language for the explanation.
    pub language: Option<String>,
    /// Unset means requests may wait forever.
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            explanation_page_url: DEFAULT_EXPLANATION_PAGE_URL.to_string(),
            banner_element_id: DEFAULT_BANNER_ELEMENT_ID.to_string(),
            explanation_element_id: DEFAULT_EXPLANATION_ELEMENT_ID.to_string(),
            language: None,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn time_url(&self) -> String {
        format!("{}{TIME_PATH}", self.api_base_url.trim_end_matches('/'))
    }

    pub fn explanation_api_url(&self) -> String {
        format!("{}{EXPLANATION_PATH}", self.api_base_url.trim_end_matches('/'))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Replaces values no host can run with by their defaults.
    fn sanitized(mut self) -> Self {
        if self.poll_interval_ms == 0 {
            log::warn!(
                "poll_interval_ms must be positive; using {DEFAULT_POLL_INTERVAL_MS}"
            );
            self.poll_interval_ms = DEFAULT_POLL_INTERVAL_MS;
        }
        self
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config, ConfigError> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content).unwrap_or_else(|err| {
        log::warn!("Ignoring unparseable config {}: {}", path.display(), err);
        Config::default()
    });
    Ok(config.sanitized())
}
