use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Declarative route classification. Paths in neither list are public.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct RoutesConfig {
    /// Only reachable without a session (login, register).
    #[serde(default = "default_auth_only")]
    pub auth_only: Vec<String>,
    /// Only reachable with a session.
    #[serde(default = "default_protected")]
    pub protected: Vec<String>,
    /// Where signed-in users are sent.
    #[serde(default = "default_home")]
    pub home: String,
    /// Where anonymous users are sent.
    #[serde(default = "default_login")]
    pub login: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        RoutesConfig {
            auth_only: default_auth_only(),
            protected: default_protected(),
            home: default_home(),
            login: default_login(),
        }
    }
}

fn default_auth_only() -> Vec<String> {
    vec!["/login".to_string(), "/register".to_string()]
}

fn default_protected() -> Vec<String> {
    vec!["/welcome".to_string(), "/profile".to_string()]
}

fn default_home() -> String {
    "/welcome".to_string()
}

fn default_login() -> String {
    "/login".to_string()
}
