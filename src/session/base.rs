use crate::config::{Environment, SessionConfig};
use crate::models::SessionToken;

/// Failure of the session backend itself. Never a domain error: callers
/// treat it as an infrastructure fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// The SessionStore trait abstracts where the single session token lives
/// (set, read, delete).
pub trait SessionStore: Send + Sync {
    /// Stores `token`, replacing any previous one.
    fn set_session(&self, token: &SessionToken) -> Result<(), SessionError>;
    /// Returns the current token if present and not expired.
    fn get_session(&self) -> Result<Option<SessionToken>, SessionError>;
    /// Removes the token. Removing an absent token is not an error.
    fn clear_session(&self) -> Result<(), SessionError>;

    fn has_session(&self) -> Result<bool, SessionError> {
        Ok(self.get_session()?.is_some())
    }
}

/// Attributes stamped on the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookieSettings {
    pub name: String,
    pub max_age_seconds: i64,
    pub path: String,
    pub http_only: bool,
    pub secure: bool,
}

impl SessionCookieSettings {
    /// Builds the cookie attributes for the given environment. Only production
    /// marks the cookie `Secure`.
    pub fn new(config: &SessionConfig, environment: Environment) -> Self {
        SessionCookieSettings {
            name: config.cookie_name.clone(),
            max_age_seconds: config.max_age_seconds,
            path: "/".to_string(),
            http_only: true,
            secure: environment.is_production(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_only_in_production() {
        let config = SessionConfig::default();
        let dev = SessionCookieSettings::new(&config, Environment::Development);
        let prod = SessionCookieSettings::new(&config, Environment::Production);
        assert!(!dev.secure);
        assert!(prod.secure);
        for settings in [dev, prod] {
            assert!(settings.http_only);
            assert_eq!(settings.path, "/");
            assert_eq!(settings.name, "auth_token");
            assert_eq!(settings.max_age_seconds, 604_800);
        }
    }
}
