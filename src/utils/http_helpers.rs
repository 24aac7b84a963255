use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::executors::ErrorOrigin;
use crate::forms::{FailureKind, SubmitOutcome};
use crate::session::SessionError;

/// A general purpose HTTP error type that can be converted into an `IntoResponse`.
#[derive(Debug)]
pub struct HTTPError {
    status: StatusCode,
    message: String,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status code and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        HTTPError {
            status,
            message: message.into(),
        }
    }
}

/// Session backend failures are infrastructure errors.
impl From<SessionError> for HTTPError {
    fn from(e: SessionError) -> Self {
        tracing::error!("Session store error: {}", e);
        HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, "Session store unavailable")
    }
}

/// Converts our `HTTPError` into an HTTP response.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.message }).to_string();
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

/// Status code for a re-rendered form page.
pub fn outcome_status(outcome: &SubmitOutcome) -> StatusCode {
    match outcome {
        SubmitOutcome::Succeeded { .. } => StatusCode::SEE_OTHER,
        SubmitOutcome::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitOutcome::Ignored => StatusCode::CONFLICT,
        SubmitOutcome::Failed(err) => match err.kind {
            FailureKind::Rejected => match err.origin {
                ErrorOrigin::Login => StatusCode::UNAUTHORIZED,
                ErrorOrigin::AccessRequest => StatusCode::BAD_REQUEST,
            },
            FailureKind::Protocol | FailureKind::Transport => StatusCode::BAD_GATEWAY,
            FailureKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

/// Minimal HTML escaping for text and attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormError;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn failures_map_to_statuses() {
        let failed = |kind| {
            SubmitOutcome::Failed(FormError {
                origin: ErrorOrigin::Login,
                kind,
                message: String::new(),
            })
        };
        assert_eq!(outcome_status(&failed(FailureKind::Rejected)), StatusCode::UNAUTHORIZED);
        assert_eq!(outcome_status(&failed(FailureKind::Transport)), StatusCode::BAD_GATEWAY);
        assert_eq!(outcome_status(&failed(FailureKind::Protocol)), StatusCode::BAD_GATEWAY);
        assert_eq!(
            outcome_status(&failed(FailureKind::Infrastructure)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(outcome_status(&SubmitOutcome::Ignored), StatusCode::CONFLICT);

        let access_rejected = SubmitOutcome::Failed(FormError {
            origin: ErrorOrigin::AccessRequest,
            kind: FailureKind::Rejected,
            message: String::new(),
        });
        assert_eq!(outcome_status(&access_rejected), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn http_error_is_json() {
        let response = HTTPError::new(StatusCode::BAD_REQUEST, "bad \"input\"").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "bad \"input\"");
    }
}
