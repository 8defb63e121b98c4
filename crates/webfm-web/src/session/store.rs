use std::time::{Duration, Instant};

use dashmap::DashMap;
use webfm_core::Location;

/// Per-browser navigation state.
#[derive(Debug, Clone)]
pub struct BrowseSession {
    pub location: Location,
    pub touched_at: Instant,
}

impl BrowseSession {
    pub fn at(location: Location) -> Self {
        Self {
            location,
            touched_at: Instant::now(),
        }
    }
}

pub struct SessionStore {
    sessions: DashMap<String, BrowseSession>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Looks up a live session and marks it as used.
    pub fn get(&self, session_id: &str) -> Option<BrowseSession> {
        let mut entry = self.sessions.get_mut(session_id)?;
        if entry.touched_at.elapsed() > self.ttl {
            tracing::debug!("Session expired: id={session_id}");
            drop(entry);
            self.sessions.remove(session_id);
            return None;
        }
        entry.touched_at = Instant::now();
        Some(entry.clone())
    }

    /// The session's current location, or the filesystem root for a new or
    /// expired session.
    pub fn location(&self, session_id: &str) -> Location {
        self.get(session_id)
            .map(|s| s.location)
            .unwrap_or_default()
    }

    pub fn set_location(&self, session_id: &str, location: Location) {
        tracing::debug!("Session {session_id} at {}", location.as_str());
        self.sessions
            .insert(session_id.to_string(), BrowseSession::at(location));
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn cleanup_expired(&self) {
        let ttl = self.ttl;
        let before = self.len();
        self.sessions
            .retain(|_, session| session.touched_at.elapsed() <= ttl);
        let removed = before.saturating_sub(self.len());
        if removed > 0 {
            tracing::debug!("Removed {removed} expired sessions");
        }
    }
}
