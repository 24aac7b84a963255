use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use super::base::{SessionError, SessionStore};
use crate::config::DEFAULT_SESSION_MAX_AGE_SECONDS;
use crate::models::SessionToken;

struct StoredSession {
    token: SessionToken,
    expires_at: DateTime<Utc>,
}

/// An in-process session store that tracks expiry itself.
///
/// Useful for driving the form machines without an HTTP exchange.
pub struct MemorySessionStore {
    max_age: Duration,
    slot: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::with_max_age(Duration::seconds(DEFAULT_SESSION_MAX_AGE_SECONDS))
    }

    pub fn with_max_age(max_age: Duration) -> Self {
        MemorySessionStore {
            max_age,
            slot: Mutex::new(None),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    fn set_session(&self, token: &SessionToken) -> Result<(), SessionError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| SessionError::Unavailable("memory store lock poisoned".into()))?;
        *slot = Some(StoredSession {
            token: token.clone(),
            expires_at: Utc::now() + self.max_age,
        });
        Ok(())
    }

    fn get_session(&self) -> Result<Option<SessionToken>, SessionError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| SessionError::Unavailable("memory store lock poisoned".into()))?;
        let expired = matches!(&*slot, Some(s) if Utc::now() >= s.expires_at);
        if expired {
            *slot = None;
        }
        Ok(slot.as_ref().map(|s| s.token.clone()))
    }

    fn clear_session(&self) -> Result<(), SessionError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| SessionError::Unavailable("memory store lock poisoned".into()))?;
        *slot = None;
        Ok(())
    }
}
