//! Temporary-access request handlers, both from the login page panel and
//! from the standalone register page.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::executors::{AccessExecutor, Executor};
use crate::forms::{parse_form_id, FormMachine, SubmitOutcome};
use crate::metrics::MetricsRecorder;
use crate::models::AccessRequest;
use crate::session::CookieSessionStore;
use crate::state::AppState;
use crate::utils::http_helpers::outcome_status;
use crate::views::{self, LoginPage, RegisterPage};

/// Registers access-request routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/request-access", post(submit_from_login))
        .route("/register", get(register_page).post(submit_from_register))
        .route("/access-requested", get(access_requested))
}

#[derive(Deserialize, Default)]
pub struct AccessForm {
    #[serde(default)]
    pub form_id: Option<String>,
    #[serde(default)]
    pub email: String,
}

struct Submission {
    form_id: Uuid,
    machine: Arc<FormMachine<AccessExecutor>>,
    outcome: SubmitOutcome,
}

/// Runs one access-request submission through its form machine.
async fn submit(state: &AppState, jar: CookieJar, form: &AccessForm) -> Submission {
    let form_id = parse_form_id(form.form_id.as_deref());
    let machine = state.access_forms.instance(form_id);
    let store = Arc::new(CookieSessionStore::new(jar, (*state.cookie).clone()));
    let form_name = state.access_forms.executor().origin().as_str();

    let started = Instant::now();
    let outcome = machine
        .submit(AccessRequest::new(form.email.clone()), store)
        .await;
    state
        .metrics
        .record_form_duration(form_name, started.elapsed().as_secs_f64());
    state
        .metrics
        .record_form_submission(form_name, outcome.label());

    if let SubmitOutcome::Succeeded { .. } = outcome {
        info!(
            event_name = "forms.access.succeeded",
            event_domain = "forms",
            "access request sent"
        );
        // The form starts over blank on the next visit.
        state.access_forms.forget(&form_id);
    }

    Submission {
        form_id,
        machine,
        outcome,
    }
}

/// Access request from the panel on the login page.
async fn submit_from_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AccessForm>,
) -> Response {
    let Submission {
        form_id,
        machine,
        outcome,
    } = submit(&state, jar, &form).await;

    let status = outcome_status(&outcome);
    match outcome {
        SubmitOutcome::Succeeded { redirect_to } => Redirect::to(&redirect_to).into_response(),
        other => {
            let access_errors = match other {
                SubmitOutcome::Invalid(errors) => errors,
                _ => machine.field_errors(),
            };
            let page = LoginPage {
                login_form_id: state.login_forms.issue_id(),
                access_form_id: form_id,
                email: form.email,
                access_errors,
                error: machine.error(),
                show_access: true,
                ..LoginPage::default()
            };
            (status, Html(views::login_page(&page))).into_response()
        }
    }
}

async fn register_page(State(state): State<AppState>) -> Html<String> {
    Html(views::register_page(&RegisterPage {
        form_id: state.access_forms.issue_id(),
        ..RegisterPage::default()
    }))
}

/// Access request from the standalone register page.
async fn submit_from_register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AccessForm>,
) -> Response {
    let Submission {
        form_id,
        machine,
        outcome,
    } = submit(&state, jar, &form).await;

    let status = outcome_status(&outcome);
    match outcome {
        SubmitOutcome::Succeeded { redirect_to } => Redirect::to(&redirect_to).into_response(),
        other => {
            let field_errors = match other {
                SubmitOutcome::Invalid(errors) => errors,
                _ => machine.field_errors(),
            };
            let page = RegisterPage {
                form_id,
                email: form.email,
                field_errors,
                error: machine.error(),
            };
            (status, Html(views::register_page(&page))).into_response()
        }
    }
}

async fn access_requested() -> impl IntoResponse {
    (StatusCode::OK, Html(views::access_requested_page()))
}
