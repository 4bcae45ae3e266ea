//! Game sessions and the in-memory store that owns them.
//!
//! Sessions are never removed unless an eviction TTL is configured; without
//! one the store grows for the lifetime of the process.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// One game instance, bound to a fixed target article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    /// Article the player was meant to start from (informational)
    pub begin: String,
    /// Target article
    pub end: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Case-sensitive check of a requested title against the target.
    pub fn is_target(&self, title: &str) -> bool {
        self.end == title
    }
}

/// Process-wide table of live sessions, keyed by id.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and store a session with a fresh, unused id.
    pub fn create(&self, begin: &str, end: &str) -> Session {
        let mut sessions = self.write();
        let id = loop {
            let candidate = uuid::Uuid::new_v4().to_string();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        let session = Session {
            id: id.clone(),
            begin: begin.to_string(),
            end: end.to_string(),
            created_at: Utc::now(),
        };
        sessions.insert(id, session.clone());
        session
    }

    pub fn lookup(&self, id: &str) -> Option<Session> {
        self.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drop every session created more than `max_age` ago.
    /// Returns the number of sessions removed.
    pub fn evict_older_than(&self, max_age: Duration) -> usize {
        // A cutoff before the earliest representable time leaves nothing to evict.
        let Some(cutoff) = Utc::now().checked_sub_signed(max_age) else {
            return 0;
        };
        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|_, s| s.created_at >= cutoff);
        before - sessions.len()
    }

    // Entries are plain values, so a poisoned lock still holds a usable map.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Session>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}
