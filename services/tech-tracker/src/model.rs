//! Wire records exchanged with the Tech Tracker API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current status snapshot for one technician, identified by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    pub name: String,
    pub status: String,
    #[serde(with = "crate::timestamp")]
    pub time: DateTime<Utc>,
}

/// One entry of a status update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicianUpdate {
    pub name: String,
    pub status: String,
}

/// Request envelope for the update endpoint
///
/// The endpoint accepts a batch, this client always sends exactly one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBatch {
    pub technicians: Vec<TechnicianUpdate>,
}

impl UpdateBatch {
    pub fn single(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            technicians: vec![TechnicianUpdate {
                name: name.into(),
                status: status.into(),
            }],
        }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One past status change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicianHistoryEntry {
    pub name: String,
    pub status: String,
    #[serde(with = "crate::timestamp")]
    pub time: DateTime<Utc>,
}

/// Pagination descriptor returned alongside a history page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub current_page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
}

/// Response envelope of the history endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPage {
    pub data: Vec<TechnicianHistoryEntry>,
    pub meta: PageMetadata,
}

/// Decode the technician list endpoint body
pub fn decode_technicians(body: &str) -> crate::Result<Vec<Technician>> {
    Ok(serde_json::from_str(body)?)
}

/// Decode the history endpoint body
pub fn decode_history(body: &str) -> crate::Result<HistoryPage> {
    Ok(serde_json::from_str(body)?)
}
