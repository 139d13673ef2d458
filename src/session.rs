//! Per-upload sessions
//!
//! Each uploaded file becomes one session: an immutable [`Table`] shared
//! behind an `Arc`, plus the [`ViewState`] the user's controls have built up.
//! Sessions live in memory; once [`MAX_SESSIONS`] exist, each new upload
//! evicts the oldest one.

use crate::error::{Error, Result};
use crate::selection::{ControlEvent, ViewState};
use crate::table::Table;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

pub const MAX_SESSIONS: usize = 32;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub file_name: Option<String>,
    pub table: Arc<Table>,
    pub view: ViewState,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
    /// Ids oldest first.
    order: VecDeque<String>,
    next_id: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly loaded table and return its session.
    pub fn create(&mut self, table: Table, file_name: Option<String>) -> &Session {
        while self.order.len() >= MAX_SESSIONS {
            if let Some(old) = self.order.pop_front() {
                log::debug!("evicting session {}", old);
                self.sessions.remove(&old);
            }
        }

        self.next_id += 1;
        let id = format!("s{}", self.next_id);
        self.order.push_back(id.clone());
        self.sessions.entry(id.clone()).or_insert(Session {
            id,
            file_name,
            table: Arc::new(table),
            view: ViewState::default(),
        })
    }

    pub fn get(&self, id: &str) -> Result<&Session> {
        self.sessions
            .get(id)
            .ok_or_else(|| Error::UnknownSession(id.to_string()))
    }

    /// Apply a control change to a session's view.
    pub fn apply(&mut self, id: &str, event: ControlEvent) -> Result<&Session> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| Error::UnknownSession(id.to_string()))?;
        let table = Arc::clone(&session.table);
        session.view.apply(event, &table)?;
        Ok(session)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
