//! In-memory stand-in for the Tech Tracker server

use std::sync::Mutex;

use tech_tracker::client::{HISTORY_PATH, TECHNICIANS_PATH, UPDATE_PATH};
use tech_tracker::io::{HttpClient, HttpResponse};
use tech_tracker::model::{Technician, UpdateBatch};
use tech_tracker::timestamp::parse_timestamp;
use tech_tracker::TechTrackerError;

/// Timestamp the fake server stamps on every accepted update
pub const UPDATE_TIME: &str = "2024-04-06T13:00:00.000Z";

/// A request the fake server has seen
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub page: Option<u32>,
    pub body: Option<String>,
}

/// Server-side data and failure switches
#[derive(Debug, Default)]
pub struct FakeApiState {
    pub technicians: Vec<Technician>,
    pub raw_technicians: Option<String>,
    pub update_status: Option<u16>,
    pub history_pages: u32,
    pub forced_history_page: Option<u32>,
    pub offline: bool,
    pub requests: Vec<RecordedRequest>,
}

#[derive(Debug, Default)]
pub struct FakeApi {
    inner: Mutex<FakeApiState>,
}

impl FakeApi {
    pub fn with_state<R>(&self, f: impl FnOnce(&mut FakeApiState) -> R) -> R {
        let mut state = self.inner.lock().unwrap();
        f(&mut state)
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.with_state(|s| {
            s.requests
                .iter()
                .filter(|r| r.method == method && r.path == path)
                .cloned()
                .collect()
        })
    }

    fn record(&self, method: &str, url: &str, body: Option<&str>) -> (String, Option<u32>) {
        let parsed = reqwest::Url::parse(url).unwrap();
        let path = parsed.path().to_string();
        let page = parsed
            .query_pairs()
            .find(|(k, _)| k == "page")
            .and_then(|(_, v)| v.parse().ok());

        self.with_state(|s| {
            s.requests.push(RecordedRequest {
                method: method.to_string(),
                path: path.clone(),
                page,
                body: body.map(|b| b.to_string()),
            })
        });
        (path, page)
    }
}

pub fn history_page_body(page: u32, total_pages: u32) -> String {
    format!(
        r#"{{
            "data": [
                {{"name": "Alice", "status": "page {page} first", "time": "2024-04-06T10:00:00.000Z"}},
                {{"name": "Bob", "status": "page {page} second", "time": "2024-04-06T09:30:00.500Z"}}
            ],
            "meta": {{"current_page": {page}, "per_page": 2, "total_pages": {total_pages}, "total_count": {count}}}
        }}"#,
        count = total_pages * 2
    )
}

fn respond(status: u16, body: String) -> tech_tracker::Result<HttpResponse> {
    Ok(HttpResponse { status, body })
}

#[async_trait::async_trait]
impl HttpClient for FakeApi {
    async fn get(&self, url: &str) -> tech_tracker::Result<HttpResponse> {
        let (path, page) = self.record("GET", url, None);

        self.with_state(|s| {
            if s.offline {
                return Err(TechTrackerError::Http("connection refused".to_string()));
            }
            match path.as_str() {
                TECHNICIANS_PATH => {
                    let body = match &s.raw_technicians {
                        Some(raw) => raw.clone(),
                        None => serde_json::to_string(&s.technicians).unwrap(),
                    };
                    respond(200, body)
                }
                HISTORY_PATH => {
                    let requested = page.unwrap_or(1);
                    let served = s.forced_history_page.unwrap_or(requested);
                    if served == 0 || served > s.history_pages {
                        return respond(404, "page not found".to_string());
                    }
                    respond(200, history_page_body(served, s.history_pages))
                }
                _ => respond(404, "not found".to_string()),
            }
        })
    }

    async fn post_json(&self, url: &str, body: &str) -> tech_tracker::Result<HttpResponse> {
        let (path, _) = self.record("POST", url, Some(body));

        self.with_state(|s| {
            if s.offline {
                return Err(TechTrackerError::Http("connection refused".to_string()));
            }
            if path != UPDATE_PATH {
                return respond(404, "not found".to_string());
            }
            if let Some(status) = s.update_status {
                return respond(status, "rejected".to_string());
            }

            let batch: UpdateBatch = serde_json::from_str(body).unwrap();
            for update in batch.technicians {
                if let Some(t) = s.technicians.iter_mut().find(|t| t.name == update.name) {
                    t.status = update.status;
                    t.time = parse_timestamp(UPDATE_TIME).unwrap();
                }
            }
            respond(200, r#"{"message":"ok"}"#.to_string())
        })
    }
}
