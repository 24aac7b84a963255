use std::collections::HashMap;

use crate::config::RoutesConfig;

/// How a request path is treated by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    /// Reachable by anyone. The default for unlisted paths.
    Public,
    /// Only reachable without a session (login, register).
    AuthOnly,
    /// Only reachable with a session.
    Protected,
}

impl RouteClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteClass::Public => "public",
            RouteClass::AuthOnly => "auth_only",
            RouteClass::Protected => "protected",
        }
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Continue,
    RedirectTo(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteTableError {
    #[error("path '{0}' is listed as both auth-only and protected")]
    Conflict(String),
    #[error("redirect target '{0}' must be an absolute path")]
    InvalidTarget(String),
}

/// Static, total classification of request paths.
///
/// Matching is exact on the URI path: no prefixes, no trailing-slash folding.
#[derive(Debug, Clone)]
pub struct RouteTable {
    classes: HashMap<String, RouteClass>,
    home: String,
    login: String,
}

impl RouteTable {
    pub fn new(config: &RoutesConfig) -> Result<Self, RouteTableError> {
        for target in [&config.home, &config.login] {
            if !target.starts_with('/') {
                return Err(RouteTableError::InvalidTarget(target.clone()));
            }
        }

        let mut classes = HashMap::new();
        for path in &config.auth_only {
            classes.insert(path.clone(), RouteClass::AuthOnly);
        }
        for path in &config.protected {
            if classes.insert(path.clone(), RouteClass::Protected) == Some(RouteClass::AuthOnly) {
                return Err(RouteTableError::Conflict(path.clone()));
            }
        }

        Ok(RouteTable {
            classes,
            home: config.home.clone(),
            login: config.login.clone(),
        })
    }

    pub fn classify(&self, path: &str) -> RouteClass {
        self.classes
            .get(path)
            .copied()
            .unwrap_or(RouteClass::Public)
    }

    /// Decides whether a request to `path` may proceed given whether the
    /// caller holds a session token. Performs no I/O.
    pub fn decide(&self, path: &str, has_session: bool) -> GuardDecision {
        match (self.classify(path), has_session) {
            (RouteClass::AuthOnly, true) => GuardDecision::RedirectTo(self.home.clone()),
            (RouteClass::Protected, false) => GuardDecision::RedirectTo(self.login.clone()),
            _ => GuardDecision::Continue,
        }
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    pub fn login(&self) -> &str {
        &self.login
    }
}
