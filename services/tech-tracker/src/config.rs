//! Configuration types for the tech tracker client

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable consulted when the config file carries no API key
pub const API_KEY_ENV_VAR: &str = "TECH_TRACKER_API_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default = "default_quick_statuses")]
    pub quick_statuses: Vec<String>,
}

/// Remote API endpoint and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_seconds: None,
        }
    }
}

/// History paging behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Drop history responses that belong to a superseded request
    #[serde(default)]
    pub discard_stale_responses: bool,
}

impl Config {
    /// Fill in the API key from the environment when the file does not set one
    pub fn resolve_secrets(&mut self) -> crate::Result<()> {
        let from_env = std::env::var(API_KEY_ENV_VAR).ok();
        self.resolve_api_key(from_env)
    }

    fn resolve_api_key(&mut self, from_env: Option<String>) -> crate::Result<()> {
        let configured = self.api.api_key.as_deref().is_some_and(|k| !k.is_empty());
        if configured {
            return Ok(());
        }

        match from_env.filter(|k| !k.is_empty()) {
            Some(key) => {
                tracing::debug!("Using API key from {}", API_KEY_ENV_VAR);
                self.api.api_key = Some(key);
                Ok(())
            }
            None => Err(crate::TechTrackerError::Config(format!(
                "No API key configured; set api.api_key or {}",
                API_KEY_ENV_VAR
            ))),
        }
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            history: HistoryConfig::default(),
            quick_statuses: default_quick_statuses(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_quick_statuses() -> Vec<String> {
    [
        "In the Office",
        "At desk",
        "At lunch",
        "At Hardy",
        "At Police Department",
        "At City Hall",
        "In a meeting",
        "Out today",
        "Running late",
        "End of Shift",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::TechTrackerError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
