//! Shared client state and change notifications

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::model::{HistoryPage, Technician, TechnicianHistoryEntry};

/// Capacity of the state event channel; slow subscribers see `Lagged`
pub const EVENT_CHANNEL_CAPACITY: usize = 100;

/// The operation a notification refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchTechnicians,
    UpdateStatus,
    FetchHistory,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::FetchTechnicians => write!(f, "fetch technicians"),
            Operation::UpdateStatus => write!(f, "update status"),
            Operation::FetchHistory => write!(f, "fetch history"),
        }
    }
}

/// Notification published to subscribers whenever state changes or a request fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    TechniciansUpdated,
    HistoryUpdated,
    PaginationUpdated { current_page: u32, total_pages: u32 },
    RequestFailed { operation: Operation, message: String },
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientState {
    pub technicians: Vec<Technician>,
    pub history: Vec<TechnicianHistoryEntry>,
    pub current_page: u32,
    pub total_page_count: u32,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            technicians: Vec::new(),
            history: Vec::new(),
            current_page: 1,
            total_page_count: 1,
        }
    }
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the technician list wholesale
    pub fn replace_technicians(&mut self, technicians: Vec<Technician>) {
        self.technicians = technicians;
    }

    /// Replace the history page and take pagination bounds from the server metadata
    pub fn apply_history_page(&mut self, page: HistoryPage) {
        self.history = page.data;
        self.current_page = page.meta.current_page;
        self.total_page_count = page.meta.total_pages;
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_page_count
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn technician(&self, name: &str) -> Option<&Technician> {
        self.technicians.iter().find(|t| t.name == name)
    }
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<ClientState>>;

pub fn new_state_handle() -> StateHandle {
    Arc::new(RwLock::new(ClientState::new()))
}
