//! Tech Tracker - technician status client
//!
//! Fetches technician statuses, pushes status updates and pages through the
//! status change history of a Tech Tracker server.

pub mod client;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod state;
pub mod timestamp;

pub use client::TechTrackerClient;
pub use config::{load_config, Config};
pub use error::{Result, TechTrackerError};
pub use state::{ClientState, Operation, StateEvent};

use std::sync::Arc;
use std::time::Duration;

use crate::io::{HttpClient, ReqwestHttpClient};

/// Builds a [`TechTrackerClient`] from configuration
pub struct ClientBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
}

impl ClientBuilder {
    pub fn new(config: Config) -> Self {
        Self { config, http: None }
    }

    /// Use a specific transport instead of the reqwest client
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Result<TechTrackerClient> {
        let api_key = self
            .config
            .api
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| TechTrackerError::Config("API key is not set".to_string()))?;

        let http: Arc<dyn HttpClient> = match self.http {
            Some(http) => http,
            None => match self.config.api.timeout_seconds {
                Some(seconds) => Arc::new(ReqwestHttpClient::with_timeout(Duration::from_secs(
                    seconds,
                ))?),
                None => Arc::new(ReqwestHttpClient::new()),
            },
        };

        tracing::debug!(
            "Building client for {} (discard_stale_responses={})",
            self.config.base_url(),
            self.config.history.discard_stale_responses
        );

        Ok(
            TechTrackerClient::new(http, self.config.base_url(), api_key)
                .with_stale_history_guard(self.config.history.discard_stale_responses),
        )
    }
}
