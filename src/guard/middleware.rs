use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use super::table::GuardDecision;
use crate::metrics::MetricsRecorder;
use crate::session::{CookieSessionStore, SessionStore};
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Axum middleware applying the route table to every request.
///
/// GET and HEAD are redirected with 307. Anything else, such as a form POST
/// to an auth-only page, gets a 303 so the browser follows up with a GET.
/// A failing session store is an internal error, not an anonymous visitor.
pub async fn route_guard(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let keeps_method = matches!(*request.method(), Method::GET | Method::HEAD);
    let store = CookieSessionStore::new(jar, (*state.cookie).clone());
    let has_session = match store.has_session() {
        Ok(present) => present,
        Err(e) => return HTTPError::from(e).into_response(),
    };

    let class = state.routes.classify(&path);
    let decision = state.routes.decide(&path, has_session);
    state.metrics.record_guard_decision(
        class.as_str(),
        match decision {
            GuardDecision::Continue => "continue",
            GuardDecision::RedirectTo(_) => "redirect",
        },
    );

    match decision {
        GuardDecision::Continue => next.run(request).await,
        GuardDecision::RedirectTo(target) => {
            debug!(
                event_name = "guard.redirect",
                event_domain = "guard",
                path = path.as_str(),
                target = target.as_str(),
                "route guard redirect"
            );
            if keeps_method {
                Redirect::temporary(&target).into_response()
            } else {
                Redirect::to(&target).into_response()
            }
        }
    }
}
