use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::time::timeout;
use tracing::debug;

use crate::session::{SessionError, SessionStore};

/// Shown when a failure carries no usable description.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";
/// Shown when the provider answered with a success status but an unusable body.
pub const PROTOCOL_ERROR_MESSAGE: &str = "Received an unexpected response from the identity provider";

/// Which form an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorOrigin {
    Login,
    AccessRequest,
}

impl ErrorOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorOrigin::Login => "login",
            ErrorOrigin::AccessRequest => "access",
        }
    }
}

/// A validation failure attached to one input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// All validation failures of one submission, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors(Vec::new())
    }

    pub fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for `field`, if that field failed.
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    /// `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Everything that can go wrong while executing one external call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutorError {
    /// Input rejected locally; no request was sent.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    /// The provider answered with a non-success status.
    #[error("rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    /// The provider answered with success but the body was unusable.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// No response at all.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ExecutorError {
    /// The text shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            ExecutorError::Validation(errors) => errors.to_string(),
            ExecutorError::Rejected { message, .. } => message.clone(),
            ExecutorError::Protocol(_) => PROTOCOL_ERROR_MESSAGE.to_string(),
            ExecutorError::Transport(fault) if fault.trim().is_empty() => {
                UNKNOWN_ERROR_MESSAGE.to_string()
            }
            ExecutorError::Transport(fault) => fault.clone(),
        }
    }
}

/// An executor issues one external call and turns its outcome into a
/// domain-level success or failure.
#[async_trait::async_trait]
pub trait Executor: Send + Sync + 'static {
    type Input: Send + Sync + 'static;
    type Output: Send + 'static;

    /// The form this executor serves, used to tag errors.
    fn origin(&self) -> ErrorOrigin;

    /// Checks the input without any I/O.
    fn validate(&self, input: &Self::Input) -> Result<(), FieldErrors>;

    /// Sends the request. Assumes `validate` already passed.
    async fn call(&self, input: &Self::Input) -> Result<Self::Output, ExecutorError>;

    /// What a confirmed success leaves behind in the session.
    fn on_success(
        &self,
        output: Self::Output,
        session: &dyn SessionStore,
    ) -> Result<(), SessionError>;

    /// Validates, then calls. Invalid input never reaches the network.
    async fn execute(&self, input: &Self::Input) -> Result<Self::Output, ExecutorError> {
        self.validate(input).map_err(ExecutorError::Validation)?;
        self.call(input).await
    }
}

/// Thin JSON-over-HTTP client shared by the executors.
#[derive(Clone)]
pub struct IdentityClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl IdentityClient {
    pub fn new(timeout_in_ms: u64) -> Self {
        IdentityClient {
            client: reqwest::Client::new(),
            timeout: Duration::from_millis(timeout_in_ms),
        }
    }

    /// POSTs `payload` as JSON. Any failure to obtain a response, including
    /// the timeout, is a transport error.
    pub async fn post_json<T>(&self, url: &str, payload: &T) -> Result<reqwest::Response, ExecutorError>
    where
        T: Serialize + ?Sized + Sync,
    {
        debug!("Sending identity request to: {}", url);
        let send = self.client.post(url).json(payload).send();
        match timeout(self.timeout, send).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(ExecutorError::Transport(e.to_string())),
            Err(_) => Err(ExecutorError::Transport(format!(
                "Request to {} timed out after {} ms",
                url,
                self.timeout.as_millis()
            ))),
        }
    }
}

/// Turns a non-success response into `Rejected`, preferring the body's
/// `message` field over `fallback`.
pub async fn rejection(response: reqwest::Response, fallback: &str) -> ExecutorError {
    let status = response.status().as_u16();
    let message = match response.json::<Value>().await {
        Ok(body) => extract_message(&body),
        Err(e) => {
            debug!("Rejection body is not JSON: {}", e);
            None
        }
    };
    ExecutorError::Rejected {
        status,
        message: message.unwrap_or_else(|| fallback.to_string()),
    }
}

/// A non-empty string `message` field, if the body has one.
pub fn extract_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
