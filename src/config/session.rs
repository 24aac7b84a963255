use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Seven days.
pub const DEFAULT_SESSION_MAX_AGE_SECONDS: i64 = 60 * 60 * 24 * 7;

/// Session cookie naming and lifetime. Whether the cookie is `Secure`
/// follows `ConfigV1::environment`.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_max_age_seconds")]
    pub max_age_seconds: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            cookie_name: default_cookie_name(),
            max_age_seconds: default_max_age_seconds(),
        }
    }
}

fn default_cookie_name() -> String {
    "auth_token".to_string()
}

fn default_max_age_seconds() -> i64 {
    DEFAULT_SESSION_MAX_AGE_SECONDS
}
