//! Login and logout endpoint handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{debug, info};

use crate::executors::Executor;
use crate::forms::{parse_form_id, SubmitOutcome};
use crate::metrics::MetricsRecorder;
use crate::models::LoginCredentials;
use crate::session::{CookieSessionStore, SessionStore};
use crate::state::AppState;
use crate::utils::http_helpers::{outcome_status, HTTPError};
use crate::views::{self, LoginPage};

/// Registers login and logout routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(submit_login))
        .route("/logout", post(logout))
}

#[derive(Deserialize, Default)]
pub struct LoginQuery {
    /// Opens the request-access panel.
    #[serde(default)]
    pub request_access: bool,
}

#[derive(Deserialize, Default)]
pub struct LoginForm {
    #[serde(default)]
    pub form_id: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Renders the login page with fresh form instances.
async fn login_page(State(state): State<AppState>, Query(query): Query<LoginQuery>) -> Html<String> {
    Html(views::login_page(&LoginPage {
        login_form_id: state.login_forms.issue_id(),
        access_form_id: state.access_forms.issue_id(),
        show_access: query.request_access,
        ..LoginPage::default()
    }))
}

/// Submits the login form. On success the session cookie is set and the
/// browser is sent home; otherwise the page is rendered again with errors.
async fn submit_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, HTTPError> {
    let form_id = parse_form_id(form.form_id.as_deref());
    let machine = state.login_forms.instance(form_id);
    let store = Arc::new(CookieSessionStore::new(jar, (*state.cookie).clone()));
    let form_name = state.login_forms.executor().origin().as_str();

    let started = Instant::now();
    let outcome = machine
        .submit(
            LoginCredentials::new(form.username.clone(), form.password),
            store.clone(),
        )
        .await;
    state
        .metrics
        .record_form_duration(form_name, started.elapsed().as_secs_f64());
    state
        .metrics
        .record_form_submission(form_name, outcome.label());

    let status = outcome_status(&outcome);
    match outcome {
        SubmitOutcome::Succeeded { redirect_to } => {
            info!(
                event_name = "forms.login.succeeded",
                event_domain = "forms",
                "user signed in"
            );
            debug!(username = form.username.as_str(), "session issued");
            state.login_forms.forget(&form_id);
            Ok((store.jar()?, Redirect::to(&redirect_to)).into_response())
        }
        other => {
            let login_errors = match other {
                SubmitOutcome::Invalid(errors) => errors,
                _ => machine.field_errors(),
            };
            let page = LoginPage {
                login_form_id: form_id,
                access_form_id: state.access_forms.issue_id(),
                username: form.username,
                login_errors,
                error: machine.error(),
                ..LoginPage::default()
            };
            Ok((status, Html(views::login_page(&page))).into_response())
        }
    }
}

/// Clears the session cookie and sends the browser to the login page.
async fn logout(State(state): State<AppState>, jar: CookieJar) -> Result<Response, HTTPError> {
    let store = CookieSessionStore::new(jar, (*state.cookie).clone());
    let had_session = store.has_session()?;
    store.clear_session()?;
    info!(
        event_name = "session.logout",
        event_domain = "session",
        had_session,
        "session cleared"
    );
    Ok((store.jar()?, Redirect::to(state.routes.login())).into_response())
}
