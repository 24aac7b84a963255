use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where the identity provider lives and how to talk to it.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct IdentityConfig {
    /// Base URL without trailing slash, e.g. `https://dummyjson.com`.
    pub base_url: String,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_access_path")]
    pub access_path: String,
    /// Name of the field carrying the session token in a successful login body.
    #[serde(default = "default_token_field")]
    pub token_field: String,
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
}

impl IdentityConfig {
    pub fn login_url(&self) -> String {
        join_url(&self.base_url, &self.login_path)
    }

    pub fn access_url(&self) -> String {
        join_url(&self.base_url, &self.access_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn default_login_path() -> String {
    "/auth/login".to_string()
}

fn default_access_path() -> String {
    "/api/request-access".to_string()
}

fn default_token_field() -> String {
    "accessToken".to_string()
}

fn default_timeout_in_ms() -> u64 {
    10_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_joined_with_a_single_slash() {
        let cfg = IdentityConfig {
            base_url: "http://127.0.0.1:1234/".to_string(),
            login_path: "/auth/login".to_string(),
            access_path: "api/request-access".to_string(),
            token_field: default_token_field(),
            timeout_in_ms: 100,
        };
        assert_eq!(cfg.login_url(), "http://127.0.0.1:1234/auth/login");
        assert_eq!(cfg.access_url(), "http://127.0.0.1:1234/api/request-access");
    }
}
