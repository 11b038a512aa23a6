//! Request DTOs.

use serde::Deserialize;

/// Form body of `POST /join`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JoinForm {
    /// Session code to join. Blank creates a session under a new code.
    #[serde(default)]
    pub code: String,
}
