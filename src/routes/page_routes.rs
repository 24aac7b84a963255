//! Landing page and the protected pages behind the route guard.

use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::views;

/// Registers page routes. Reachability is decided by the route guard, not
/// here.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(landing))
        .route("/welcome", get(welcome))
        .route("/profile", get(profile))
}

async fn landing() -> Html<String> {
    Html(views::landing_page())
}

async fn welcome() -> Html<String> {
    Html(views::welcome_page())
}

async fn profile() -> Html<String> {
    Html(views::profile_page())
}
