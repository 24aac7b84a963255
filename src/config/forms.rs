use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Bounds for the per-form-instance state kept between page render and submit.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct FormsConfig {
    /// Maximum number of live form instances per form type.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Seconds after which an untouched form instance is forgotten.
    #[serde(default = "default_lifespan_seconds")]
    pub lifespan_seconds: u64,
}

impl Default for FormsConfig {
    fn default() -> Self {
        FormsConfig {
            capacity: default_capacity(),
            lifespan_seconds: default_lifespan_seconds(),
        }
    }
}

fn default_capacity() -> usize {
    10_000
}

fn default_lifespan_seconds() -> u64 {
    60 * 60
}
