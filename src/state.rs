//! Shared application state.
//!
//! Contains the state that is shared across all request handlers,
//! including configuration, the route table, the form registries and metrics.

use std::sync::Arc;

use crate::config::ConfigV1;
use crate::executors::{AccessExecutor, LoginExecutor};
use crate::forms::FormRegistry;
use crate::guard::RouteTable;
use crate::metrics::Metrics;
use crate::session::SessionCookieSettings;

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request handler; everything heavy sits
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Path classification consulted by the route guard.
    pub routes: Arc<RouteTable>,
    /// Attributes of the session cookie.
    pub cookie: Arc<SessionCookieSettings>,
    /// Live login forms.
    pub login_forms: Arc<FormRegistry<LoginExecutor>>,
    /// Live access-request forms.
    pub access_forms: Arc<FormRegistry<AccessExecutor>>,
    /// Prometheus metrics.
    pub metrics: Metrics,
}
