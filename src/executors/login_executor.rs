use serde_json::Value;
use tracing::{debug, info, warn};

use super::base::{rejection, ErrorOrigin, Executor, ExecutorError, FieldErrors, IdentityClient};
use crate::config::IdentityConfig;
use crate::models::{LoginCredentials, SessionToken};
use crate::session::{SessionError, SessionStore};

/// Shown when the provider rejects a login without saying why.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Exchanges a username and password for a session token at the identity
/// provider's login endpoint.
pub struct LoginExecutor {
    http: IdentityClient,
    url: String,
    token_field: String,
}

impl LoginExecutor {
    pub fn new(config: &IdentityConfig) -> Self {
        info!("Creating login executor for '{}'", config.login_url());
        LoginExecutor {
            http: IdentityClient::new(config.timeout_in_ms),
            url: config.login_url(),
            token_field: config.token_field.clone(),
        }
    }

    /// Validates the credentials, then performs exactly one login call.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SessionToken, ExecutorError> {
        self.execute(&LoginCredentials::new(username, password))
            .await
    }

    fn token_from_body(&self, body: &Value) -> Result<SessionToken, ExecutorError> {
        body.get(&self.token_field)
            .and_then(Value::as_str)
            .and_then(SessionToken::new)
            .ok_or_else(|| {
                ExecutorError::Protocol(format!(
                    "login response has no usable '{}' field",
                    self.token_field
                ))
            })
    }
}

/// Username must be non-blank; password must have at least six characters.
pub fn validate_credentials(credentials: &LoginCredentials) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if credentials.username.trim().is_empty() {
        errors.push("username", "Username is required");
    }
    if credentials.password.is_empty() {
        errors.push("password", "Password is required");
    } else if credentials.password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push("password", "Password must be at least 6 characters");
    }
    errors.into_result()
}

#[async_trait::async_trait]
impl Executor for LoginExecutor {
    type Input = LoginCredentials;
    type Output = SessionToken;

    fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Login
    }

    fn validate(&self, input: &LoginCredentials) -> Result<(), FieldErrors> {
        validate_credentials(input)
    }

    async fn call(&self, input: &LoginCredentials) -> Result<SessionToken, ExecutorError> {
        let response = self.http.post_json(&self.url, input).await?;

        if !response.status().is_success() {
            let error = rejection(response, LOGIN_FAILED_MESSAGE).await;
            debug!(username = input.username.as_str(), "login rejected: {}", error);
            return Err(error);
        }

        let body = response.json::<Value>().await.map_err(|e| {
            warn!("Login response body is not JSON: {}", e);
            ExecutorError::Protocol(format!("invalid login response body: {}", e))
        })?;
        let token = self.token_from_body(&body).map_err(|e| {
            warn!("{}", e);
            e
        })?;
        debug!(username = input.username.as_str(), "login accepted");
        Ok(token)
    }

    fn on_success(
        &self,
        output: SessionToken,
        session: &dyn SessionStore,
    ) -> Result<(), SessionError> {
        session.set_session(&output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn config(base_url: String) -> IdentityConfig {
        IdentityConfig {
            base_url,
            login_path: "/auth/login".to_string(),
            access_path: "/api/request-access".to_string(),
            token_field: "accessToken".to_string(),
            timeout_in_ms: 2_000,
        }
    }

    #[test]
    fn validation_rules() {
        let ok = LoginCredentials::new("alice", "secret1");
        assert!(validate_credentials(&ok).is_ok());

        let errors = validate_credentials(&LoginCredentials::new("", "")).unwrap_err();
        assert_eq!(errors.get("username"), Some("Username is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));

        let errors = validate_credentials(&LoginCredentials::new("   ", "12345")).unwrap_err();
        assert_eq!(errors.get("username"), Some("Username is required"));
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );

        // Six characters is enough, counted as characters rather than bytes.
        assert!(validate_credentials(&LoginCredentials::new("bob", "ééééé1")).is_ok());
    }

    /// A 200 with an access token yields that token.
    #[tokio::test]
    async fn test_login_success() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/auth/login")
            .match_body(Matcher::Json(
                json!({"username": "alice", "password": "secret1"}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"accessToken": "abc", "id": 1}"#)
            .expect(1)
            .create_async()
            .await;

        let executor = LoginExecutor::new(&config(server.url()));
        let token = executor.login("alice", "secret1").await.unwrap();
        m.assert_async().await;
        assert_eq!(token.as_str(), "abc");
    }

    /// A 400 carrying a message surfaces that message verbatim.
    #[tokio::test]
    async fn test_login_rejected_with_message() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/auth/login")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Invalid credentials"}"#)
            .create_async()
            .await;

        let executor = LoginExecutor::new(&config(server.url()));
        let err = executor.login("alice", "badpass").await.unwrap_err();
        m.assert_async().await;
        assert_eq!(
            err,
            ExecutorError::Rejected {
                status: 400,
                message: "Invalid credentials".to_string()
            }
        );
    }

    /// A failure without a readable message falls back to the generic text.
    #[tokio::test]
    async fn test_login_rejected_without_message() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/auth/login")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let executor = LoginExecutor::new(&config(server.url()));
        let err = executor.login("alice", "secret1").await.unwrap_err();
        m.assert_async().await;
        assert_eq!(err.user_message(), LOGIN_FAILED_MESSAGE);
    }

    /// A success without a token field is a protocol error, not a credentials error.
    #[tokio::test]
    async fn test_login_success_without_token_is_protocol_error() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/auth/login")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 1, "username": "alice"}"#)
            .create_async()
            .await;

        let executor = LoginExecutor::new(&config(server.url()));
        let err = executor.login("alice", "secret1").await.unwrap_err();
        m.assert_async().await;
        assert!(matches!(err, ExecutorError::Protocol(_)));
    }

    /// A success with a non-JSON body is a protocol error too.
    #[tokio::test]
    async fn test_login_success_with_garbage_body() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/auth/login")
            .with_status(200)
            .with_body("<html>hello</html>")
            .create_async()
            .await;

        let executor = LoginExecutor::new(&config(server.url()));
        let err = executor.login("alice", "secret1").await.unwrap_err();
        m.assert_async().await;
        assert!(matches!(err, ExecutorError::Protocol(_)));
    }

    /// A short password never reaches the provider.
    #[tokio::test]
    async fn test_short_password_issues_no_call() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/auth/login")
            .expect(0)
            .create_async()
            .await;

        let executor = LoginExecutor::new(&config(server.url()));
        let err = executor.login("alice", "bad").await.unwrap_err();
        m.assert_async().await;
        assert!(matches!(err, ExecutorError::Validation(_)));
    }

    /// No listener at all is a transport error with a message from the fault.
    #[tokio::test]
    async fn test_login_transport_failure() {
        let executor = LoginExecutor::new(&config("http://127.0.0.1:1".to_string()));
        let err = executor.login("alice", "secret1").await.unwrap_err();
        match &err {
            ExecutorError::Transport(fault) => assert!(!fault.is_empty()),
            other => panic!("expected transport error, got {:?}", other),
        }
        assert!(!err.user_message().is_empty());
    }

    /// The post-success action writes the token to the session.
    #[test]
    fn success_stores_session() {
        let executor = LoginExecutor::new(&config("http://127.0.0.1:1".to_string()));
        let store = MemorySessionStore::new();
        executor
            .on_success(SessionToken::new("abc").unwrap(), &store)
            .unwrap();
        assert_eq!(store.get_session().unwrap().unwrap().as_str(), "abc");
    }
}
