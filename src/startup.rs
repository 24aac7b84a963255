//! Application startup and server initialization.
//!
//! This module builds the shared state from the configuration (route table,
//! cookie settings, executors and their form registries, metrics) and runs
//! the HTTP server.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::ConfigV1;
use crate::executors::{AccessExecutor, LoginExecutor};
use crate::forms::FormRegistry;
use crate::guard::{RouteTable, RouteTableError};
use crate::metrics::Metrics;
use crate::routes;
use crate::session::SessionCookieSettings;
use crate::state::AppState;

/// Where a successful access request sends the browser.
pub const ACCESS_REQUESTED_PATH: &str = "/access-requested";

/// Builds the application state from a loaded configuration.
///
/// # Errors
///
/// Returns an error if the configured route table is inconsistent.
pub fn build_state(config: Arc<ConfigV1>) -> Result<AppState, RouteTableError> {
    let routes = Arc::new(RouteTable::new(&config.routes)?);
    let cookie = Arc::new(SessionCookieSettings::new(
        &config.session,
        config.environment,
    ));

    let login_forms = Arc::new(FormRegistry::new(
        LoginExecutor::new(&config.identity),
        routes.home(),
        &config.forms,
    ));
    let access_forms = Arc::new(FormRegistry::new(
        AccessExecutor::new(&config.identity),
        ACCESS_REQUESTED_PATH,
        &config.forms,
    ));

    Ok(AppState {
        config,
        routes,
        cookie,
        login_forms,
        access_forms,
        metrics: Metrics::new(),
    })
}

/// Initializes and runs the application server.
///
/// Binds to the address specified in the configuration and serves requests
/// until the process is stopped.
///
/// # Errors
///
/// Returns an error if the state cannot be built, the server fails to bind to
/// the specified address, or it encounters a runtime error during execution.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(config.clone())?;

    info!(
        "Starting server on {} ({:?})",
        config.bind_address, config.environment
    );

    let app = routes::create_router(state);
    let listener = TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
