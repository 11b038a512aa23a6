//! Session and identity configuration.

use serde::{Deserialize, Serialize};

/// Session code and identity cookie settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Length of generated session codes.
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    /// Name of the cookie carrying the subscriber identity.
    #[serde(default = "default_identity_cookie")]
    pub identity_cookie: String,
    /// Lifetime of the identity cookie in days.
    #[serde(default = "default_identity_cookie_max_age_days")]
    pub identity_cookie_max_age_days: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            identity_cookie: default_identity_cookie(),
            identity_cookie_max_age_days: default_identity_cookie_max_age_days(),
        }
    }
}

fn default_code_length() -> usize {
    5
}

fn default_identity_cookie() -> String {
    "uid".to_string()
}

fn default_identity_cookie_max_age_days() -> i64 {
    365
}
