//! HTTP client abstraction for testability

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::CONTENT_TYPE;

use crate::TechTrackerError;

static API_KEY_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"apikey=[^&]*").expect("static regex is valid")
});

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a GET request to the given URL
    async fn get(&self, url: &str) -> crate::Result<HttpResponse>;

    /// Send a POST request with a JSON body
    async fn post_json(&self, url: &str, body: &str) -> crate::Result<HttpResponse>;
}

/// Replace the value of the `apikey` query parameter so URLs can be logged
pub fn redact_api_key(url: &str) -> String {
    API_KEY_PARAM.replace_all(url, "apikey=***").into_owned()
}

/// Production HTTP client using reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a client with an overall request timeout
    pub fn with_timeout(timeout: Duration) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TechTrackerError::Http(format!("Building HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> crate::Result<HttpResponse> {
        let logged_url = redact_api_key(url);
        tracing::debug!("GET {}", logged_url);
        let response = self.client.get(url).send().await.map_err(|e| {
            TechTrackerError::Http(format!(
                "GET {} failed: {}",
                logged_url,
                e.without_url()
            ))
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TechTrackerError::Http(format!("Reading response body: {}", e)))?;

        tracing::debug!("GET {} -> {} ({} bytes)", logged_url, status, body.len());
        Ok(HttpResponse { status, body })
    }

    async fn post_json(&self, url: &str, body: &str) -> crate::Result<HttpResponse> {
        let logged_url = redact_api_key(url);
        tracing::debug!("POST {} ({} bytes)", logged_url, body.len());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| {
                TechTrackerError::Http(format!(
                    "POST {} failed: {}",
                    logged_url,
                    e.without_url()
                ))
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TechTrackerError::Http(format!("Reading response body: {}", e)))?;

        tracing::debug!("POST {} -> {} ({} bytes)", logged_url, status, body.len());
        Ok(HttpResponse { status, body })
    }
}
