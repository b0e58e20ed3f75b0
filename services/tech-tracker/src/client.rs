//! Tech Tracker API client: technician list, status updates and history paging

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use reqwest::Url;
use tokio::sync::broadcast;

use crate::io::{redact_api_key, HttpClient, HttpResponse};
use crate::model::{decode_history, decode_technicians, HistoryPage, Technician, UpdateBatch};
use crate::state::{
    new_state_handle, ClientState, Operation, StateEvent, StateHandle, EVENT_CHANNEL_CAPACITY,
};
use crate::TechTrackerError;

pub const TECHNICIANS_PATH: &str = "/api/technicians";
pub const UPDATE_PATH: &str = "/api/update_technicians";
pub const HISTORY_PATH: &str = "/api/history";

/// Client for the Tech Tracker API
///
/// Cloning is cheap and every clone shares the same state and event channel,
/// so an operation can be handed to `tokio::spawn` and forgotten.
#[derive(Clone)]
pub struct TechTrackerClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
    api_key: String,
    state: StateHandle,
    events: broadcast::Sender<StateEvent>,
    history_sequence: Arc<AtomicU64>,
    discard_stale_history: bool,
}

impl std::fmt::Debug for TechTrackerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TechTrackerClient")
            .field("base_url", &self.base_url)
            .field("discard_stale_history", &self.discard_stale_history)
            .finish()
    }
}

impl TechTrackerClient {
    pub fn new(http: Arc<dyn HttpClient>, base_url: &str, api_key: &str) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let base_url = base_url.trim_end_matches('/').to_string();

        tracing::debug!("Created TechTrackerClient for {}", base_url);

        Self {
            http,
            base_url,
            api_key: api_key.to_string(),
            state: new_state_handle(),
            events,
            history_sequence: Arc::new(AtomicU64::new(0)),
            discard_stale_history: false,
        }
    }

    /// Ignore history responses overtaken by a newer history request
    pub fn with_stale_history_guard(mut self, enabled: bool) -> Self {
        self.discard_stale_history = enabled;
        self
    }

    /// Subscribe to state change and failure notifications
    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.events.subscribe()
    }

    /// Shared state handle, for readers that hold on to it
    pub fn state(&self) -> StateHandle {
        Arc::clone(&self.state)
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> ClientState {
        self.state.read().await.clone()
    }

    /// Fetch the technician list and replace local state with it
    pub async fn fetch_technicians(&self) -> crate::Result<()> {
        let technicians = match self.request_technicians().await {
            Ok(technicians) => technicians,
            Err(e) => return Err(self.report(Operation::FetchTechnicians, e)),
        };

        let count = technicians.len();
        self.state.write().await.replace_technicians(technicians);
        tracing::debug!("Applied technician list ({} entries)", count);

        self.publish(StateEvent::TechniciansUpdated);
        Ok(())
    }

    /// Push a new status for one technician, then re-fetch the list
    ///
    /// Local state is never touched directly; the follow-up fetch is what
    /// brings the change in. An error from that fetch is returned as-is.
    pub async fn update_status(&self, name: &str, status: &str) -> crate::Result<()> {
        if let Err(e) = self.submit_update(name, status).await {
            return Err(self.report(Operation::UpdateStatus, e));
        }

        tracing::info!("Updated status of '{}' to '{}'", name, status);
        self.fetch_technicians().await
    }

    /// Fetch one page of history; page bounds come from the response metadata
    pub async fn fetch_history_page(&self, page: u32) -> crate::Result<()> {
        let sequence = self.history_sequence.fetch_add(1, Ordering::SeqCst) + 1;

        let history = match self.request_history(page).await {
            Ok(history) => history,
            Err(e) => return Err(self.report(Operation::FetchHistory, e)),
        };

        let (current_page, total_pages) = {
            let mut state = self.state.write().await;
            let latest = self.history_sequence.load(Ordering::SeqCst);
            if self.discard_stale_history && latest != sequence {
                tracing::debug!(
                    "Discarding history response for page {} (request {}, latest {})",
                    page,
                    sequence,
                    latest
                );
                return Ok(());
            }
            state.apply_history_page(history);
            (state.current_page, state.total_page_count)
        };

        tracing::debug!("Applied history page {} of {}", current_page, total_pages);

        self.publish(StateEvent::HistoryUpdated);
        self.publish(StateEvent::PaginationUpdated {
            current_page,
            total_pages,
        });
        Ok(())
    }

    /// Move to the next history page. Returns false without any request on the last page.
    pub async fn next_page(&self) -> crate::Result<bool> {
        let target = {
            let mut state = self.state.write().await;
            if !state.has_next_page() {
                tracing::debug!(
                    "Already on last history page ({} of {})",
                    state.current_page,
                    state.total_page_count
                );
                return Ok(false);
            }
            state.current_page += 1;
            state.current_page
        };

        self.fetch_history_page(target).await?;
        Ok(true)
    }

    /// Move to the previous history page. Returns false without any request on page 1.
    pub async fn previous_page(&self) -> crate::Result<bool> {
        let target = {
            let mut state = self.state.write().await;
            if !state.has_previous_page() {
                tracing::debug!("Already on first history page");
                return Ok(false);
            }
            state.current_page -= 1;
            state.current_page
        };

        self.fetch_history_page(target).await?;
        Ok(true)
    }

    async fn request_technicians(&self) -> crate::Result<Vec<Technician>> {
        let url = self.endpoint(TECHNICIANS_PATH, &[])?;
        let response = self.http.get(&url).await?;
        ensure_success(&response)?;
        decode_technicians(&response.body)
    }

    async fn submit_update(&self, name: &str, status: &str) -> crate::Result<()> {
        let url = self.endpoint(UPDATE_PATH, &[])?;
        let body = UpdateBatch::single(name, status).to_json()?;
        let response = self.http.post_json(&url, &body).await?;
        ensure_success(&response)
    }

    async fn request_history(&self, page: u32) -> crate::Result<HistoryPage> {
        let page = page.to_string();
        let url = self.endpoint(HISTORY_PATH, &[("page", page.as_str())])?;
        let response = self.http.get(&url).await?;
        ensure_success(&response)?;
        decode_history(&response.body)
    }

    fn endpoint(&self, path: &str, extra: &[(&str, &str)]) -> crate::Result<String> {
        let mut params = vec![("apikey", self.api_key.as_str())];
        params.extend_from_slice(extra);

        let raw = format!("{}{}", self.base_url, path);
        Url::parse_with_params(&raw, &params)
            .map(|url| url.to_string())
            .map_err(|e| {
                TechTrackerError::Config(format!("Invalid API URL {}: {}", redact_api_key(&raw), e))
            })
    }

    fn report(&self, operation: Operation, error: TechTrackerError) -> TechTrackerError {
        tracing::warn!("Failed to {}: {}", operation, error);
        self.publish(StateEvent::RequestFailed {
            operation,
            message: error.to_string(),
        });
        error
    }

    fn publish(&self, event: StateEvent) {
        // Err only means there are no subscribers
        self.events.send(event).ok();
    }
}

fn ensure_success(response: &HttpResponse) -> crate::Result<()> {
    if response.is_success() {
        Ok(())
    } else {
        Err(TechTrackerError::Status {
            status: response.status,
            body: response.body.clone(),
        })
    }
}
