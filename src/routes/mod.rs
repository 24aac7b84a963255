//! HTTP route definitions and handlers.
//!
//! This module organizes all HTTP endpoints into logical groups:
//! login/logout, access requests, pages, and operational endpoints. Every
//! route sits behind the route guard.

mod access_routes;
mod auth_routes;
mod ops_routes;
mod page_routes;

use axum::middleware;
use axum::Router;

use crate::guard::route_guard;
use crate::state::AppState;

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router, wraps it in the route
/// guard and attaches the application state for access in handlers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(auth_routes::routes())
        .merge(access_routes::routes())
        .merge(page_routes::routes())
        .merge(ops_routes::routes())
        .layer(middleware::from_fn_with_state(state.clone(), route_guard))
        .with_state(state)
}
