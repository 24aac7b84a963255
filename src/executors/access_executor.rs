use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use super::base::{rejection, ErrorOrigin, Executor, ExecutorError, FieldErrors, IdentityClient};
use crate::config::IdentityConfig;
use crate::models::AccessRequest;
use crate::session::{SessionError, SessionStore};

/// Shown when the provider rejects an access request without saying why.
pub const ACCESS_FAILED_MESSAGE: &str = "Failed to send access request";

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"(?i-u)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email pattern compiles")
    })
}

/// Asks the provider to grant temporary access to an email address.
pub struct AccessExecutor {
    http: IdentityClient,
    url: String,
}

impl AccessExecutor {
    pub fn new(config: &IdentityConfig) -> Self {
        info!("Creating access executor for '{}'", config.access_url());
        AccessExecutor {
            http: IdentityClient::new(config.timeout_in_ms),
            url: config.access_url(),
        }
    }

    /// Validates the address, then sends one access request. Repeated calls
    /// send repeated requests.
    pub async fn request_access(&self, email: &str) -> Result<(), ExecutorError> {
        self.execute(&AccessRequest::new(email)).await
    }
}

pub fn validate_access_request(request: &AccessRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if request.email.is_empty() {
        errors.push("email", "Email is required");
    } else if !email_pattern().is_match(&request.email) {
        errors.push("email", "Invalid email address");
    }
    errors.into_result()
}

#[async_trait::async_trait]
impl Executor for AccessExecutor {
    type Input = AccessRequest;
    type Output = ();

    fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::AccessRequest
    }

    fn validate(&self, input: &AccessRequest) -> Result<(), FieldErrors> {
        validate_access_request(input)
    }

    async fn call(&self, input: &AccessRequest) -> Result<(), ExecutorError> {
        let response = self.http.post_json(&self.url, input).await?;
        if response.status().is_success() {
            debug!("access request accepted");
            Ok(())
        } else {
            let error = rejection(response, ACCESS_FAILED_MESSAGE).await;
            debug!("access request rejected: {}", error);
            Err(error)
        }
    }

    fn on_success(&self, _output: (), _session: &dyn SessionStore) -> Result<(), SessionError> {
        // Access requests grant nothing until the emailed link is used.
        Ok(())
    }
}
