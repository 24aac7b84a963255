use std::sync::{Mutex, MutexGuard};

use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::debug;

use super::base::{SessionCookieSettings, SessionError, SessionStore};
use crate::models::SessionToken;

/// A session store backed by the cookies of a single HTTP exchange.
///
/// Reads see the cookies the browser sent plus anything set during this
/// request; writes are recorded in the jar, which the handler returns so they
/// reach the browser as `Set-Cookie` headers. Expiry is enforced by the
/// browser through `Max-Age`.
pub struct CookieSessionStore {
    settings: SessionCookieSettings,
    jar: Mutex<CookieJar>,
}

impl CookieSessionStore {
    pub fn new(jar: CookieJar, settings: SessionCookieSettings) -> Self {
        CookieSessionStore {
            settings,
            jar: Mutex::new(jar),
        }
    }

    /// Snapshot of the jar including pending changes, ready to be returned
    /// from a handler.
    pub fn jar(&self) -> Result<CookieJar, SessionError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, CookieJar>, SessionError> {
        self.jar
            .lock()
            .map_err(|_| SessionError::Unavailable("cookie jar lock poisoned".to_string()))
    }

    fn session_cookie(&self, value: String) -> Cookie<'static> {
        Cookie::build((self.settings.name.clone(), value))
            .http_only(self.settings.http_only)
            .secure(self.settings.secure)
            .path(self.settings.path.clone())
            .max_age(time::Duration::seconds(self.settings.max_age_seconds))
            .build()
    }
}

impl SessionStore for CookieSessionStore {
    fn set_session(&self, token: &SessionToken) -> Result<(), SessionError> {
        let cookie = self.session_cookie(token.as_str().to_string());
        let mut jar = self.lock()?;
        *jar = jar.clone().add(cookie);
        debug!(cookie = self.settings.name.as_str(), "session cookie set");
        Ok(())
    }

    fn get_session(&self) -> Result<Option<SessionToken>, SessionError> {
        let jar = self.lock()?;
        Ok(jar
            .get(&self.settings.name)
            .and_then(|cookie| SessionToken::new(cookie.value())))
    }

    fn clear_session(&self) -> Result<(), SessionError> {
        // The removal cookie must carry the same path as the original.
        let removal = Cookie::build((self.settings.name.clone(), ""))
            .path(self.settings.path.clone())
            .build();
        let mut jar = self.lock()?;
        *jar = jar.clone().remove(removal);
        debug!(cookie = self.settings.name.as_str(), "session cookie cleared");
        Ok(())
    }
}
