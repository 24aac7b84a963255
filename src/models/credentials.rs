use std::fmt;

use serde::{Deserialize, Serialize};

/// Username and password as sent to the identity provider.
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        LoginCredentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Payload of a temporary-access request.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AccessRequest {
    pub email: String,
}

impl AccessRequest {
    pub fn new(email: impl Into<String>) -> Self {
        AccessRequest {
            email: email.into(),
        }
    }
}
